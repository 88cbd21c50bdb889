use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Source column for every destination column and source row for every
/// destination row.
pub struct ScaleLut {
    src_x: Vec<usize>,
    src_y: Vec<usize>,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            src_x: Vec::new(),
            src_y: Vec::new(),
        }
    }

    pub fn dst_size(&self) -> (usize, usize) {
        (self.src_x.len(), self.src_y.len())
    }
}

fn nearest(dst_len: usize, src_len: usize) -> Vec<usize> {
    let s = src_len as f32 / dst_len as f32;
    (0..dst_len)
        .map(|d| (((d as f32 + 0.5) * s) as usize).min(src_len.saturating_sub(1)))
        .collect()
}

pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    ScaleLut {
        src_x: nearest(dst_w, src_w),
        src_y: nearest(dst_h, src_h),
    }
}

/// Nearest-neighbour stretch of `src` (row stride `sw`) into `dst` (row stride
/// `dw`). Rows are written in parallel.
pub fn blit_nearest_stretch(dst: &mut [u32], dw: usize, src: &[u32], sw: usize, lut: &ScaleLut) {
    dst.par_chunks_mut(dw)
        .zip(lut.src_y.par_iter())
        .for_each(|(dst_row, &sy)| {
            let src_row = &src[sy * sw..(sy + 1) * sw];
            for (d, &sx) in dst_row.iter_mut().zip(&lut.src_x) {
                *d = src_row[sx];
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_scale_copies() {
        let src: Vec<u32> = (0..12).collect();
        let lut = build_scale_lut(4, 3, 4, 3);
        let mut dst = vec![0; 12];
        blit_nearest_stretch(&mut dst, 4, &src, 4, &lut);
        assert_eq!(dst, src);
    }

    #[test]
    fn doubling_repeats_pixels() {
        let src = vec![1, 2, 3, 4];
        let lut = build_scale_lut(4, 4, 2, 2);
        assert_eq!(lut.dst_size(), (4, 4));
        let mut dst = vec![0; 16];
        blit_nearest_stretch(&mut dst, 4, &src, 2, &lut);
        assert_eq!(
            dst,
            vec![1, 1, 2, 2, 1, 1, 2, 2, 3, 3, 4, 4, 3, 3, 4, 4]
        );
    }

    #[test]
    fn shrinking_stays_in_bounds() {
        let lut = build_scale_lut(3, 1, 800, 600);
        assert!(lut.src_x.iter().all(|&x| x < 800));
        assert!(lut.src_y.iter().all(|&y| y < 600));
    }
}
