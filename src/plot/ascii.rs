//! Character-grid charts for `mda show`.
//!
//! A fixed grid with one glyph per series. Output depends only on the input,
//! so tests compare whole strings. Gaps in the data are left blank.

use crate::plot::chart::{ChartData, fmt_value, fmt_year};

const GLYPHS: [char; 6] = ['*', '+', 'o', 'x', '#', '@'];

/// Render prepared chart data into a `width × height` character grid.
pub fn render_ascii_chart(data: &ChartData, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let [x_min, x_max] = data.x_bounds;
    let [y_min, y_max] = data.y_bounds;

    let mut grid = vec![vec![' '; width]; height];

    for (idx, series) in data.series.iter().enumerate() {
        let glyph = GLYPHS[idx % GLYPHS.len()];
        for segment in &series.segments {
            draw_segment(&mut grid, segment, [x_min, x_max], [y_min, y_max], glyph);
        }
    }

    let mut out = format!(
        "Plot: dates=[{}, {}] | y=[{}, {}]\n",
        fmt_year(x_min),
        fmt_year(x_max),
        fmt_value(y_min),
        fmt_value(y_max),
    );
    for row in &grid {
        out.extend(row.iter());
        out.push('\n');
    }

    let legend = data
        .series
        .iter()
        .zip(GLYPHS.iter().cycle())
        .map(|(s, glyph)| format!("{glyph} {}", s.label))
        .collect::<Vec<_>>()
        .join("  ");
    out + &legend + "\n"
}

fn draw_segment(grid: &mut [Vec<char>], segment: &[(f64, f64)], xb: [f64; 2], yb: [f64; 2], ch: char) {
    let rows = grid.len();
    let cols = grid[0].len();

    let cells: Vec<(usize, usize)> = segment
        .iter()
        .map(|&(x, y)| {
            let col = scale(x, xb, cols);
            // Row 0 is the top of the plot.
            let row = rows - 1 - scale(y, yb, rows);
            (col, row)
        })
        .collect();

    if let [(col, row)] = cells.as_slice() {
        grid[*row][*col] = ch;
    }
    for pair in cells.windows(2) {
        plot_line(grid, pair[0], pair[1], ch);
    }
}

/// Map `v` within `bounds` onto `0..cells`.
fn scale(v: f64, bounds: [f64; 2], cells: usize) -> usize {
    let span = bounds[1] - bounds[0];
    let u = if span > 0.0 { ((v - bounds[0]) / span).clamp(0.0, 1.0) } else { 0.5 };
    (u * (cells.max(2) - 1) as f64).round() as usize
}

/// Connect two cells by stepping along the longer axis.
fn plot_line(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize), ch: char) {
    let (c0, r0) = (from.0 as f64, from.1 as f64);
    let (c1, r1) = (to.0 as f64, to.1 as f64);
    let steps = from.0.abs_diff(to.0).max(from.1.abs_diff(to.1)).max(1);

    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let col = (c0 + (c1 - c0) * t).round() as usize;
        let row = (r0 + (r1 - r0) * t).round() as usize;
        if let Some(cell) = grid.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = ch;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::chart::PlotSeries;

    #[test]
    fn flat_series_golden_snapshot() {
        let data = ChartData {
            series: vec![PlotSeries {
                label: "Rate".to_string(),
                segments: vec![vec![(2020.0, 1.0), (2021.0, 1.0)]],
            }],
            x_bounds: [2020.0, 2021.0],
            y_bounds: [0.0, 2.0],
        };

        let txt = render_ascii_chart(&data, 10, 5);
        let expected = concat!(
            "Plot: dates=[2020, 2021] | y=[0.00, 2.00]\n",
            "          \n",
            "          \n",
            "**********\n",
            "          \n",
            "          \n",
            "* Rate\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn gap_leaves_blank_columns() {
        let data = ChartData {
            series: vec![PlotSeries {
                label: "A".to_string(),
                segments: vec![vec![(0.0, 0.0), (1.0, 0.0)], vec![(9.0, 0.0), (10.0, 0.0)]],
            }],
            x_bounds: [0.0, 10.0],
            y_bounds: [-1.0, 1.0],
        };
        let txt = render_ascii_chart(&data, 11, 5);
        let middle = txt.lines().nth(3).unwrap();
        assert_eq!(middle, "**       **");
    }

    #[test]
    fn second_series_uses_its_own_glyph() {
        let data = ChartData {
            series: vec![
                PlotSeries { label: "A".to_string(), segments: vec![vec![(0.0, 0.0)]] },
                PlotSeries { label: "B".to_string(), segments: vec![vec![(1.0, 1.0)]] },
            ],
            x_bounds: [0.0, 1.0],
            y_bounds: [0.0, 1.0],
        };
        let txt = render_ascii_chart(&data, 10, 5);
        assert!(txt.contains('+'));
        assert!(txt.ends_with("* A  + B\n"));
    }
}
