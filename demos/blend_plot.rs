use std::error::Error;
use std::sync::Arc;

use gnuplot::*;
use motion_blend::{Motion, PiecewiseBlendedMotion, PolynomialMotion, SharedMotion};

/// Evenly spaced samples over `[start, end]`, both ends included.
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Samples of `m` restricted to `t >= from`.
fn curve(m: &dyn Motion, t: &[f64], from: f64) -> (Vec<f64>, Vec<f64>) {
    let ts: Vec<f64> = t.iter().copied().filter(|&x| x >= from).collect();
    let xs = m.at_many(&ts);
    (ts, xs)
}

/// One blend between two motions.
fn simple(t: &[f64]) -> Result<Figure, Box<dyn Error>> {
    let m1: SharedMotion = Arc::new(PolynomialMotion::new(0.0, [-0.8, 1.0, 0.5]));
    let m2: SharedMotion = Arc::new(PolynomialMotion::new(1.0, [0.0, 3.0, 5.0]));

    let tnow = 2.5;
    let h = 2.0;
    let mb1 = PiecewiseBlendedMotion::new(m1.clone(), m2.clone(), tnow, h)?;

    let mut fg = Figure::new();
    {
        let axes = fg.axes2d();
        axes.set_title("Blend of two motions", &[]);
        axes.set_x_label("t", &[]);
        axes.set_y_label("x", &[]);
        let (ts, xs) = curve(m1.as_ref(), t, m1.offset());
        axes.lines(&ts, &xs, &[Color("blue"), Caption("motion 1"), LineWidth(3.0)]);
        let (ts, xs) = curve(m2.as_ref(), t, m2.offset());
        axes.lines(&ts, &xs, &[Color("orange"), Caption("motion 2"), LineWidth(3.0)]);
        let (ts, xs) = curve(&mb1, t, m1.offset());
        axes.lines(&ts, &xs, &[Color("green"), Caption("blend")]);
        axes.lines(&[tnow, tnow], &[-10.0, 40.0], &[Color("black"), Caption("now"), LineStyle(Dash)]);
        axes.lines(&[tnow + h, tnow + h], &[-10.0, 40.0], &[Caption("now+horizon"), LineStyle(Dash)]);
    }
    Ok(fg)
}

/// Blend of a blend, with or without history flattening.
fn double_blend(t: &[f64], flatten: bool) -> Result<Figure, Box<dyn Error>> {
    let m1: SharedMotion = Arc::new(PolynomialMotion::new(0.0, [-0.8, 1.0, 0.5]));
    let m2: SharedMotion = Arc::new(PolynomialMotion::new(1.0, [0.0, 3.0, 5.0]));
    let m3: SharedMotion = Arc::new(PolynomialMotion::new(3.0, [1.2, 5.0, 7.0]));

    let h = 3.0;
    let mb1: SharedMotion = Arc::new(PiecewiseBlendedMotion::with_flatten(
        m1.clone(),
        m2.clone(),
        2.5,
        h,
        flatten,
    )?);
    let mb2 = PiecewiseBlendedMotion::with_flatten(mb1, m3.clone(), 3.5, h, flatten)?;
    log::info!("double blend (flatten={flatten}) has depth {}", mb2.depth());

    let mut fg = Figure::new();
    {
        let axes = fg.axes2d();
        axes.set_title(&format!("Double blend, flatten={flatten}"), &[]);
        axes.set_x_label("t", &[]);
        axes.set_y_label("x", &[]);
        for (m, name) in [(&m1, "motion 1"), (&m2, "motion 2"), (&m3, "motion 3")] {
            let (ts, xs) = curve(m.as_ref(), t, m.offset());
            axes.lines(&ts, &xs, &[Caption(name), LineWidth(3.0)]);
        }
        let (ts, xs) = curve(&mb2, t, m1.offset());
        axes.lines(&ts, &xs, &[Color("black"), Caption("blend2")]);
        for (x, name) in [(2.5, "start blend1"), (2.5 + h, "end blend1"), (3.5, "start blend2"), (3.5 + h, "end blend2")] {
            axes.lines(&[x, x], &[-10.0, 80.0], &[Caption(name), LineStyle(Dot)]);
        }
    }
    Ok(fg)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let t = linspace(0.0, 10.0, 100);

    let mut figures = vec![simple(&t)?];
    figures.push(double_blend(&t, false)?);
    figures.push(double_blend(&t, true)?);

    // Attempt to show in a pop-up window (might require gnuplot installed)
    for fg in &mut figures {
        fg.show().map_err(|e| format!("Failed to display plot: {e}"))?;
    }

    println!("Plotted {} scenes over {} samples.", figures.len(), t.len());
    Ok(())
}
