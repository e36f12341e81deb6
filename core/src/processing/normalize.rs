use crate::measurement::AngularSlice;

/// Rewrites the azimuth sequence of a horizontal cut into canonical [0, 360)
/// range anchored so the first sample reads exactly 0. Magnitudes and the
/// vertical cut are untouched.
///
/// `normalized[i] = ((angles[i] mod 360) - (angles[0] mod 360)) mod 360`,
/// with Euclidean modulo so the subtraction cannot leave negative values.
pub fn normalize_azimuth(slice: &mut AngularSlice) {
    let anchor = match slice.angles.first() {
        Some(first) => first.rem_euclid(360.0),
        None => return,
    };
    for angle in slice.angles.iter_mut() {
        *angle = (angle.rem_euclid(360.0) - anchor).rem_euclid(360.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice_with_angles(angles: Vec<f64>) -> AngularSlice {
        let magnitude = vec![0.0; angles.len()];
        AngularSlice::new(angles, magnitude).unwrap()
    }

    #[test]
    fn anchors_first_sample_at_zero() {
        let mut slice = slice_with_angles(vec![10.0, 100.0, 190.0, 280.0]);
        normalize_azimuth(&mut slice);
        assert_eq!(slice.angles, vec![0.0, 90.0, 180.0, 270.0]);
    }

    #[test]
    fn rewraps_negative_angles() {
        let mut slice = slice_with_angles(vec![-30.0, 60.0, 150.0]);
        normalize_azimuth(&mut slice);
        assert_eq!(slice.angles, vec![0.0, 90.0, 180.0]);
    }

    #[test]
    fn output_stays_in_range() {
        let mut slice = slice_with_angles(vec![725.0, -15.0, 359.9, 180.0, 540.0]);
        normalize_azimuth(&mut slice);
        assert_eq!(slice.angles[0], 0.0);
        for &angle in &slice.angles {
            assert!((0.0..360.0).contains(&angle), "angle {angle} out of range");
        }
    }

    #[test]
    fn idempotent_on_anchored_sequence() {
        let mut slice = slice_with_angles(vec![17.0, 33.0, 359.0, 411.0]);
        normalize_azimuth(&mut slice);
        let once = slice.angles.clone();
        normalize_azimuth(&mut slice);
        assert_eq!(slice.angles, once);
    }

    #[test]
    fn magnitudes_are_untouched() {
        let mut slice = AngularSlice::new(vec![45.0, 135.0], vec![3.0, -7.0]).unwrap();
        normalize_azimuth(&mut slice);
        assert_eq!(slice.magnitude, vec![3.0, -7.0]);
    }

    #[test]
    fn empty_slice_is_a_no_op() {
        let mut slice = slice_with_angles(vec![]);
        normalize_azimuth(&mut slice);
        assert!(slice.angles.is_empty());
    }
}
