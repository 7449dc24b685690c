use core::fmt::Write;

use crate::state::{FrequencyEstimate, StatusSnapshot};

pub const STATUS_LINE_CAP: usize = 192;
pub const WINDOW_LINE_CAP: usize = 96;

/// Per-sample status line, in the layout the host dashboard parses:
///
/// `ACC_X: 0.012, ACC_Y: -0.003, ACC_Z: 0.250 | F_Z(filt): 0.180 | Freq: 6.00 Hz | Ref: 6.00 | Motor: 5.40`
pub fn status_line(s: &StatusSnapshot) -> heapless::String<STATUS_LINE_CAP> {
    let mut m = heapless::String::new();
    let _ = write!(
        m,
        "ACC_X: {:.3}, ACC_Y: {:.3}, ACC_Z: {:.3} | F_Z(filt): {:.3} | Freq: {:.2} Hz | Ref: {:.2} | Motor: {:.2}\r\n",
        s.sample.x, s.sample.y, s.sample.z, s.filtered_z, s.estimate_hz, s.reference_hz, s.output
    );
    m
}

/// Summary printed once per closed estimation window.
pub fn window_line(e: &FrequencyEstimate) -> heapless::String<WINDOW_LINE_CAP> {
    let mut m = heapless::String::new();
    let _ = write!(
        m,
        "WINDOW: freq={:.2} Hz peak={:.3} g disp={:.2} cm\r\n",
        e.hz,
        e.peak_g,
        e.displacement_cm()
    );
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AccelerationSample;

    #[test]
    fn status_line_layout() {
        let snap = StatusSnapshot {
            sample: AccelerationSample { x: 0.0125, y: -0.5, z: 0.25, index: 3 },
            filtered_z: 0.18,
            estimate_hz: 6.0,
            reference_hz: 6.0,
            output: 5.4,
            window: None,
        };
        assert_eq!(
            status_line(&snap).as_str(),
            "ACC_X: 0.013, ACC_Y: -0.500, ACC_Z: 0.250 | F_Z(filt): 0.180 | Freq: 6.00 Hz | Ref: 6.00 | Motor: 5.40\r\n"
        );
    }

    #[test]
    fn extreme_values_still_fit() {
        let snap = StatusSnapshot {
            sample: AccelerationSample { x: -1.0e9, y: -1.0e9, z: -1.0e9, index: 0 },
            filtered_z: -1.0e9,
            estimate_hz: -1.0e9,
            reference_hz: -1.0e9,
            output: -1.0e9,
            window: None,
        };
        assert!(status_line(&snap).ends_with("\r\n"));
    }

    #[test]
    fn window_line_layout() {
        let e = FrequencyEstimate { hz: 5.0, peak_g: 1.0 };
        assert_eq!(window_line(&e).as_str(), "WINDOW: freq=5.00 Hz peak=1.000 g disp=0.99 cm\r\n");
    }
}
