use crate::hyperparameters::Config;
use crate::trainer::MetricTrace;

const CHART_WIDTH: usize = 60;
const CHART_HEIGHT: usize = 20;

/// Prints the two per-configuration report lines.
pub fn announce_configuration(config: &Config, validation_accuracy: f32) {
    println!("{config}");
    println!("Validation accuracy: {validation_accuracy}");
}

/// Prints the winning model's held-out accuracy.
pub fn announce_test_accuracy(test_accuracy: f32) {
    println!("Test accuracy: {test_accuracy}");
}

/// Renders the three metric series as one overlaid console line chart
/// against epoch index, with a title, y-axis scale, x-axis label, and
/// legend. Non-finite values are skipped rather than plotted.
pub fn plot_trace(trace: &MetricTrace) {
    let epochs = trace.epochs();
    if epochs == 0 {
        return;
    }

    let series: [(&str, char, &[f32]); 3] = [
        ("Train loss", '*', &trace.train_losses),
        ("Test loss", '+', &trace.test_losses),
        ("Test accuracy", 'o', &trace.test_accuracies),
    ];

    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for (_, _, values) in &series {
        for &v in *values {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
    }
    if !min.is_finite() || !max.is_finite() {
        println!("Training process: no finite metrics to plot");
        return;
    }
    if max - min < f32::EPSILON {
        // Flat traces still get a visible band
        max = min + 1.0;
    }

    let mut canvas = vec![[' '; CHART_WIDTH]; CHART_HEIGHT];
    for (_, glyph, values) in &series {
        for (epoch, &v) in values.iter().enumerate() {
            if !v.is_finite() {
                continue;
            }
            let col = if epochs == 1 {
                0
            } else {
                epoch * (CHART_WIDTH - 1) / (epochs - 1)
            };
            let row = ((max - v) / (max - min) * (CHART_HEIGHT - 1) as f32).round() as usize;
            canvas[row.min(CHART_HEIGHT - 1)][col] = *glyph;
        }
    }

    println!("Training process");
    println!("Loss/Accuracy");
    for (i, row) in canvas.iter().enumerate() {
        let line: String = row.iter().collect();
        if i % 5 == 0 || i == CHART_HEIGHT - 1 {
            let label = max - (max - min) * i as f32 / (CHART_HEIGHT - 1) as f32;
            println!("{label:>9.3} |{line}");
        } else {
            println!("          |{line}");
        }
    }
    println!("          +{}", "-".repeat(CHART_WIDTH));
    println!("           {:^width$}", "Epoch", width = CHART_WIDTH);
    let legend: Vec<String> = series
        .iter()
        .map(|(name, glyph, _)| format!("{glyph} {name}"))
        .collect();
    println!("           {}", legend.join("   "));
}
