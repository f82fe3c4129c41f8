//! Text reports printed by the analyzer commands

use std::io::{self, Write};

use riskaudit_analysis::{
    bias::GroupStatistics, breakdown::TraitBreakdown, correction::CorrectionOutcome,
    error_model::ErrorModel, threshold::ThresholdSweep,
};

const SEPARATOR: &str = "=========================================";

pub(crate) fn print_breakdown(w: &mut dyn Write, breakdown: &TraitBreakdown) -> io::Result<()> {
    writeln!(
        w,
        "In column {}, {} total defined rows were found",
        breakdown.attribute(),
        breakdown.total_defined_rows()
    )?;
    for (trait_name, count) in breakdown.sorted_by_count() {
        let percent = breakdown.fraction(trait_name).unwrap_or(0.0) * 100.0;
        writeln!(w, "{trait_name}: {count} found, {percent:.3}%")?;
    }
    Ok(())
}

/// Baseline lines, a separator, then corrected lines, one per group in key order.
pub(crate) fn print_correction(w: &mut dyn Write, outcome: &CorrectionOutcome) -> io::Result<()> {
    if let Some(population) = &outcome.population {
        writeln!(
            w,
            "Normalized error across all groups: {:.3}",
            population.mean_absolute_error()
        )?;
    }
    for (key, stats) in &outcome.baseline {
        print_baseline_line(w, outcome.model, &key.to_string(), stats)?;
    }
    writeln!(w, "{SEPARATOR}")?;
    for (key, stats) in &outcome.corrected {
        print_corrected_line(w, outcome.model, &key.to_string(), stats)?;
    }
    Ok(())
}

fn print_baseline_line(
    w: &mut dyn Write,
    model: ErrorModel,
    group: &str,
    stats: &GroupStatistics,
) -> io::Result<()> {
    let bias = stats.mean_signed_bias;
    match model {
        ErrorModel::Linear | ErrorModel::Threshold { .. } => writeln!(
            w,
            "For group {group}, baseline error: {:.3}, baseline bias: {bias:.3}",
            stats.mean_absolute_error()
        ),
        ErrorModel::Rms => writeln!(
            w,
            "For group {group}, rms error: {:.3}, baseline bias: {bias:.3}",
            stats.rms_error
        ),
        ErrorModel::BucketedLinear => writeln!(
            w,
            "For group {group}, baseline absolute error: {:.3}, baseline bias: {bias:.3}",
            stats.total_absolute_error
        ),
    }
}

fn print_corrected_line(
    w: &mut dyn Write,
    model: ErrorModel,
    group: &str,
    stats: &GroupStatistics,
) -> io::Result<()> {
    match model {
        ErrorModel::Linear => writeln!(
            w,
            "For group {group}, corrected error: {:.3}",
            stats.mean_absolute_error()
        ),
        ErrorModel::Rms => writeln!(
            w,
            "For group {group}, corrected rms error: {:.3}",
            stats.rms_error
        ),
        ErrorModel::BucketedLinear => writeln!(
            w,
            "For group {group}, new absolute error: {:.3}, new baseline bias: {:.3}",
            stats.total_absolute_error, stats.mean_signed_bias
        ),
        ErrorModel::Threshold { .. } => writeln!(
            w,
            "For group {group}, corrected error: {:.3}, corrected bias: {:.3}",
            stats.mean_absolute_error(),
            stats.mean_signed_bias
        ),
    }
}

pub(crate) fn print_sweep(w: &mut dyn Write, sweep: &ThresholdSweep) -> io::Result<()> {
    writeln!(w, "Threshold sweep for {}", sweep.population())?;
    writeln!(
        w,
        "  {:>9} {:>8} {:>8} {:>8} {:>8}",
        "Threshold", "FP", "FN", "Error", "Bias"
    )?;
    writeln!(w, "  {}", "-".repeat(45))?;
    for point in sweep.points() {
        writeln!(
            w,
            "  {:>9} {:>8} {:>8} {:>8.3} {:>8.3}",
            point.threshold,
            point.false_positive_count,
            point.false_negative_count,
            point.error,
            point.bias
        )?;
    }
    if let Some(best) = sweep.best() {
        writeln!(
            w,
            "Best threshold: {} ({} false positives, {} false negatives)",
            best.threshold, best.false_positive_count, best.false_negative_count
        )?;
    }
    Ok(())
}
