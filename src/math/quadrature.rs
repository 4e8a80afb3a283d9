/// Five-point Gauss-Legendre nodes on `[-1, 1]`.
const NODES: [f64; 5] = [
    0.0,
    -0.538_469_310_105_683_1,
    0.538_469_310_105_683_1,
    -0.906_179_845_938_664,
    0.906_179_845_938_664,
];

/// Weights matching [`NODES`].
const WEIGHTS: [f64; 5] = [
    0.568_888_888_888_888_9,
    0.478_628_670_499_366_47,
    0.478_628_670_499_366_47,
    0.236_926_885_056_189_08,
    0.236_926_885_056_189_08,
];

/// Integrates `f` over `[a, b]` with composite five-point Gauss-Legendre
/// quadrature on `panels` equal sub-intervals.
///
/// # Errors
///
/// Propagates the first error returned by `f`.
pub fn gauss_legendre<F, E>(a: f64, b: f64, panels: u32, mut f: F) -> Result<f64, E>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let panels = panels.max(1);
    let h = (b - a) / f64::from(panels);
    let mut sum = 0.0;
    for i in 0..panels {
        let lo = a + h * f64::from(i);
        let mid = lo + 0.5 * h;
        for (x, w) in NODES.iter().zip(WEIGHTS.iter()) {
            sum += w * f(mid + 0.5 * h * x)?;
        }
    }
    Ok(sum * 0.5 * h)
}
