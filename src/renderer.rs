use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::projector::{ColumnSpan, Rgb};

const CEILING: Rgb = Rgb::grey(100);
const FLOOR: Rgb = Rgb::grey(70);

/// Clipped, packed form of a span: rows `y0..y1` of one column.
#[derive(Clone, Copy)]
struct Slice {
    y0: usize,
    y1: usize,
    color: u32,
}

fn clip(span: &ColumnSpan, height: usize) -> Slice {
    let top = span.top as i64;
    let bottom = top + span.height.max(0) as i64;
    Slice {
        y0: top.clamp(0, height as i64) as usize,
        y1: bottom.clamp(0, height as i64) as usize,
        color: span.color.pack(),
    }
}

/// Paints ceiling, floor and wall slices into a `width * height` 0RGB buffer.
/// Spans with a column outside the buffer are ignored.
pub fn render_frame(buf: &mut [u32], width: usize, height: usize, spans: &[ColumnSpan]) {
    let mut slices = vec![None; width];
    for span in spans {
        if let Some(slot) = slices.get_mut(span.column) {
            *slot = Some(clip(span, height));
        }
    }

    let sky = CEILING.pack();
    let ground = FLOOR.pack();
    let mid = height / 2;

    buf.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        row.fill(if y < mid { sky } else { ground });
        for (x, slice) in slices.iter().enumerate() {
            if let Some(s) = slice {
                if y >= s.y0 && y < s.y1 {
                    row[x] = s.color;
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(column: usize, top: i32, height: i32, shade: u8) -> ColumnSpan {
        ColumnSpan {
            column,
            top,
            height,
            color: Rgb::grey(shade),
        }
    }

    #[test]
    fn background_split_at_horizon() {
        let (w, h) = (3, 4);
        let mut buf = vec![0; w * h];
        render_frame(&mut buf, w, h, &[]);
        assert!(buf[..w * 2].iter().all(|&p| p == CEILING.pack()));
        assert!(buf[w * 2..].iter().all(|&p| p == FLOOR.pack()));
    }

    #[test]
    fn span_is_drawn_in_its_column() {
        let (w, h) = (3, 6);
        let mut buf = vec![0; w * h];
        render_frame(&mut buf, w, h, &[span(1, 2, 2, 200)]);
        let wall = Rgb::grey(200).pack();
        for y in 0..h {
            let expected = y == 2 || y == 3;
            assert_eq!(buf[y * w + 1] == wall, expected, "row {y}");
            assert_ne!(buf[y * w], wall);
            assert_ne!(buf[y * w + 2], wall);
        }
    }

    #[test]
    fn oversized_span_is_clipped() {
        let (w, h) = (2, 4);
        let mut buf = vec![0; w * h];
        render_frame(&mut buf, w, h, &[span(0, -100, 1000, 9), span(5, 0, 4, 9)]);
        let wall = Rgb::grey(9).pack();
        for y in 0..h {
            assert_eq!(buf[y * w], wall);
            assert_ne!(buf[y * w + 1], wall);
        }
    }
}
