//! Illustrative trend charts
//!
//! Five synthetic demonstration curves (linear trend plus Gaussian
//! noise) relating flow rates and pipeline geometry to a nominal
//! predicted pressure drop. These are illustrative only and do not
//! come from the trained model or the loaded dataset. Each curve is
//! rendered to an in-memory PNG and base64-encoded.

use crate::error::{PressdropError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::prelude::*;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::collections::BTreeMap;

const PLOT_WIDTH: u32 = 640;
const PLOT_HEIGHT: u32 = 480;
const POINTS_PER_CURVE: usize = 100;

struct CurveSpec {
    key: &'static str,
    title: &'static str,
    x_label: &'static str,
    x_max: f64,
    intercept: f64,
    slope: f64,
    noise_std: f64,
}

const Y_LABEL: &str = "Predicted Pressure Drop (psig)";

const CURVES: [CurveSpec; 5] = [
    CurveSpec {
        key: "gas_flow",
        title: "Gas Flow Rate vs Predicted Pressure Drop",
        x_label: "Gas Flow Rate (SCF/D)",
        x_max: 5000.0,
        intercept: 10.0,
        slope: 0.05,
        noise_std: 5.0,
    },
    CurveSpec {
        key: "water_flow",
        title: "Water Flow Rate vs Predicted Pressure Drop",
        x_label: "Water Flow Rate (STB/D)",
        x_max: 3000.0,
        intercept: 8.0,
        slope: 0.03,
        noise_std: 3.0,
    },
    CurveSpec {
        key: "oil_flow",
        title: "Oil Flow Rate vs Predicted Pressure Drop",
        x_label: "Oil Flow Rate (STB/D)",
        x_max: 4000.0,
        intercept: 15.0,
        slope: 0.04,
        noise_std: 4.0,
    },
    CurveSpec {
        key: "length",
        title: "Pipeline Length vs Predicted Pressure Drop",
        x_label: "Pipeline Length (ft)",
        x_max: 10000.0,
        intercept: 20.0,
        slope: 0.002,
        noise_std: 2.0,
    },
    CurveSpec {
        key: "diameter",
        title: "Pipeline Diameter vs Predicted Pressure Drop",
        x_label: "Pipeline Diameter (in)",
        x_max: 48.0,
        intercept: 5.0,
        slope: 0.5,
        noise_std: 1.0,
    },
];

/// Render all five demonstration charts, keyed by plot name, each as a
/// base64-encoded PNG.
pub fn generate_graphs(seed: u64) -> Result<BTreeMap<String, String>> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut graphs = BTreeMap::new();

    for spec in &CURVES {
        let points = synthesize(spec, &mut rng)?;
        let png = render_png(spec, &points)?;
        graphs.insert(spec.key.to_string(), STANDARD.encode(&png));
    }

    Ok(graphs)
}

fn synthesize(spec: &CurveSpec, rng: &mut Xoshiro256PlusPlus) -> Result<Vec<(f64, f64)>> {
    let noise = Normal::new(0.0, spec.noise_std)
        .map_err(|e| PressdropError::PlotError(e.to_string()))?;

    Ok((0..POINTS_PER_CURVE)
        .map(|i| {
            let x = spec.x_max * i as f64 / (POINTS_PER_CURVE - 1) as f64;
            let y = spec.intercept + spec.slope * x + noise.sample(rng);
            (x, y)
        })
        .collect())
}

fn render_png(spec: &CurveSpec, points: &[(f64, f64)]) -> Result<Vec<u8>> {
    let (y_min, y_max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
            (lo.min(y), hi.max(y))
        });
    let pad = (y_max - y_min).max(1.0) * 0.05;

    let mut buffer = vec![0u8; (PLOT_WIDTH * PLOT_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (PLOT_WIDTH, PLOT_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| PressdropError::PlotError(e.to_string()))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(spec.title, ("sans-serif", 18))
            .margin(10)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(0.0..spec.x_max, (y_min - pad)..(y_max + pad))
            .map_err(|e| PressdropError::PlotError(e.to_string()))?;

        chart
            .configure_mesh()
            .x_desc(spec.x_label)
            .y_desc(Y_LABEL)
            .draw()
            .map_err(|e| PressdropError::PlotError(e.to_string()))?;

        chart
            .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
            .map_err(|e| PressdropError::PlotError(e.to_string()))?;

        root.present()
            .map_err(|e| PressdropError::PlotError(e.to_string()))?;
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(&buffer, PLOT_WIDTH, PLOT_HEIGHT, ExtendedColorType::Rgb8)
        .map_err(|e| PressdropError::PlotError(e.to_string()))?;

    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_graphs_with_expected_keys() {
        let graphs = generate_graphs(42).unwrap();
        assert_eq!(graphs.len(), 5);
        for key in ["gas_flow", "water_flow", "oil_flow", "length", "diameter"] {
            assert!(graphs.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn test_graphs_are_base64_png() {
        let graphs = generate_graphs(7).unwrap();
        for (key, encoded) in &graphs {
            let bytes = STANDARD.decode(encoded).expect("valid base64");
            assert_eq!(&bytes[..4], b"\x89PNG", "{key} should decode to a PNG");
        }
    }

    #[test]
    fn test_seed_reproducibility() {
        let a = generate_graphs(3).unwrap();
        let b = generate_graphs(3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_synthetic_curve_follows_trend() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let points = synthesize(&CURVES[0], &mut rng).unwrap();
        assert_eq!(points.len(), POINTS_PER_CURVE);
        assert_eq!(points[0].0, 0.0);
        assert_eq!(points.last().unwrap().0, CURVES[0].x_max);

        // Noise is sigma=5 around a 10 + 0.05x trend; the endpoint mean
        // is 260, so a wide band is enough to catch a broken trend.
        let (x, y) = *points.last().unwrap();
        let expected = CURVES[0].intercept + CURVES[0].slope * x;
        assert!((y - expected).abs() < 50.0);
    }
}
