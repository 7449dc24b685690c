use embassy_stm32::gpio::{AnyPin, Output};

use parkimotion::hal::{Axis, StepperPins};

/// Two step/direction driver channels sharing one active-low enable line.
pub struct StepDirPins {
    step: [Output<'static, AnyPin>; 2],
    dir: [Output<'static, AnyPin>; 2],
    enable_n: Output<'static, AnyPin>,
}

impl StepDirPins {
    pub fn new(
        step: [Output<'static, AnyPin>; 2],
        dir: [Output<'static, AnyPin>; 2],
        enable_n: Output<'static, AnyPin>,
    ) -> Self {
        Self { step, dir, enable_n }
    }
}

impl StepperPins for StepDirPins {
    fn set_step(&mut self, axis: Axis, level: bool) {
        self.step[axis as usize].set_level(level.into());
    }

    fn set_direction(&mut self, axis: Axis, level: bool) {
        self.dir[axis as usize].set_level(level.into());
    }

    fn enable(&mut self) {
        self.enable_n.set_low();
    }
}
