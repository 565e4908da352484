//! Mirroring of an image and its landmarks.

use crate::common::*;

/// Mirrors a `[C, H, W]` image left to right and moves the landmarks along.
///
/// Landmark labels are kept as they are. A left hand becomes a right hand in the
/// mirrored image while the gesture label is unchanged.
pub fn horizontal_flip(image: &Tensor, landmarks: &Landmarks) -> Result<(Tensor, Landmarks)> {
    let (_channels, height, width) = image.size3()?;

    let flipped = tch::no_grad(|| image.flip(&[2]));
    let transform = Affine2::horizontal_flip(width as f64);
    let landmarks = landmarks.transform_pixels(&transform, height as usize, width as usize);

    Ok((flipped, landmarks))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_landmarks() -> Landmarks {
        let mut points = [[0f32; 3]; NUM_LANDMARKS];
        points.iter_mut().enumerate().for_each(|(index, point)| {
            let index = index as f32;
            *point = [index / 21.0, 1.0 - index / 42.0, index * 0.01 - 0.1];
        });
        Landmarks::new(points)
    }

    #[test]
    fn flipping_twice_restores_landmarks() -> Result<()> {
        let image = Tensor::rand(&[3, 24, 36], FLOAT_CPU);
        let landmarks = sample_landmarks();

        let (once_image, once) = horizontal_flip(&image, &landmarks)?;
        let (twice_image, twice) = horizontal_flip(&once_image, &once)?;

        for (orig, flipped, restored) in izip!(landmarks.iter(), once.iter(), twice.iter()) {
            assert_abs_diff_eq!(flipped[0], 1.0 - orig[0], epsilon = 1e-6);
            assert_abs_diff_eq!(restored[0], orig[0], epsilon = 1e-6);
            assert_eq!(flipped[1], orig[1]);
            assert_eq!(flipped[2], orig[2]);
            assert_eq!(restored[1], orig[1]);
            assert_eq!(restored[2], orig[2]);
        }

        assert!(twice_image.equal(&image));
        Ok(())
    }

    #[test]
    fn flipped_landmarks_follow_the_pixels() -> Result<()> {
        let image = Tensor::zeros(&[3, 10, 20], FLOAT_CPU);
        let _ = image.i((.., 4, 3)).fill_(1.0);
        let mut landmarks = Landmarks::zeros();
        landmarks[0] = [3.5 / 20.0, 4.5 / 10.0, 0.0];

        let (flipped, landmarks) = horizontal_flip(&image, &landmarks)?;
        assert_eq!(flipped.double_value(&[0, 4, 16]), 1.0);
        assert_abs_diff_eq!(landmarks[0][0] * 20.0, 16.5, epsilon = 1e-4);
        assert_abs_diff_eq!(landmarks[0][1] * 10.0, 4.5, epsilon = 1e-4);
        Ok(())
    }
}
