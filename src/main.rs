use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use stratum_bayes::GaussianNb;
use stratum_cv::{
    Accuracy, BalancedAccuracy, Classifier, CrossValidationResult, KFold, LeaveOneOut,
    MacroSensitivity, MacroSpecificity, Scorer, ScoreSummary, Splitter, Standardized,
    StratifiedHoldout, StratifiedKFold, cross_validate,
};
use stratum_gd::{DescentConfig, DescentStep, ShiftedQuadratic};
use stratum_io::{DatasetReader, ExperimentName, LabeledDataset, ReportWriter};
use stratum_knn::{KnnClassifier, Metric};
use stratum_tree::{DecisionTreeClassifier, DecisionTreeConfig};

#[derive(Parser)]
#[command(name = "stratum")]
#[command(about = "From-scratch classifiers, cross-validation, and gradient descent")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for reproducible fold assignment
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,
}

/// Input dataset location.
#[derive(Args, Debug, Clone)]
struct DataArgs {
    /// Path to the input CSV file (header row required)
    #[arg(long)]
    data: PathBuf,

    /// Name of the integer class label column
    #[arg(long, default_value = "label")]
    label_column: String,
}

/// How rows are split into train and test sets.
#[derive(Args, Debug, Clone)]
struct ValidationArgs {
    /// Validation scheme: "stratified", "kfold", "loo", or "holdout"
    #[arg(long, default_value = "stratified")]
    validation: String,

    /// Number of folds for "stratified" and "kfold"
    #[arg(long, default_value_t = 5)]
    n_splits: usize,

    /// Held-out fraction per class for "holdout"
    #[arg(long, default_value_t = 0.30)]
    test_size: f64,

    /// Keep row order for "kfold" instead of shuffling
    #[arg(long, default_value_t = false)]
    no_shuffle: bool,
}

/// Where JSON artifacts go. Nothing is written without `--output-dir`.
#[derive(Args, Debug, Clone)]
struct OutputArgs {
    /// Experiment name for output files (must match [a-zA-Z0-9_-]+); defaults to the subcommand name
    #[arg(long)]
    experiment: Option<String>,

    /// Output directory for result files
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Cross-validate a binary Gini decision tree
    Tree {
        #[command(flatten)]
        data: DataArgs,

        /// Two class labels to keep, e.g. "1,2"; they are relabelled 0 and 1
        #[arg(long)]
        classes: Option<String>,

        /// Maximum tree depth (root is depth 0)
        #[arg(long, default_value_t = 4)]
        max_depth: usize,

        /// Minimum rows a node needs before it may split
        #[arg(long, default_value_t = 2)]
        min_samples_split: usize,

        #[command(flatten)]
        validation: ValidationArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Cross-validate a k-nearest-neighbors classifier
    Knn {
        #[command(flatten)]
        data: DataArgs,

        /// Number of neighbors
        #[arg(long, default_value_t = 3)]
        k: usize,

        /// Distance: "l2", "l1", "chebyshev", "cosine", or "hamming"
        #[arg(long, default_value = "l2")]
        metric: String,

        /// Skip standardizing features on each training fold
        #[arg(long, default_value_t = false)]
        no_scale: bool,

        #[command(flatten)]
        validation: ValidationArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Cross-validate a Gaussian Naive Bayes classifier
    Bayes {
        #[command(flatten)]
        data: DataArgs,

        /// Constant added to every per-class variance
        #[arg(long, default_value_t = 1e-9)]
        var_smoothing: f64,

        #[command(flatten)]
        validation: ValidationArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Minimize f(x, y) = (x - 3)^2 + 2(y + 1)^2 with plain gradient descent
    Descend {
        /// Initial x
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        x0: f64,

        /// Initial y
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        y0: f64,

        /// Step size
        #[arg(long, default_value_t = 0.1)]
        learning_rate: f64,

        /// Maximum iterations
        #[arg(long, default_value_t = 200)]
        epochs: usize,

        /// Stop once the gradient norm falls below this value
        #[arg(long, default_value_t = 1e-6)]
        tol: f64,

        #[command(flatten)]
        output: OutputArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct EvaluateOutput<'a> {
    model: &'static str,
    validation: &'a str,
    n_samples: usize,
    n_features: usize,
    class_counts: BTreeMap<usize, usize>,
    n_folds: usize,
    summary: &'a BTreeMap<String, ScoreSummary>,
    confusion_matrix: Option<&'a [Vec<usize>]>,
}

#[derive(Serialize)]
struct TreeOutput<'a> {
    #[serde(flatten)]
    evaluation: EvaluateOutput<'a>,
    max_depth: usize,
    min_samples_split: usize,
    full_fit_nodes: usize,
    full_fit_leaves: usize,
    full_fit_depth: usize,
}

#[derive(Serialize)]
struct DescendOutput<'a> {
    converged: bool,
    epochs_used: usize,
    point: &'a [f64],
    value: f64,
    first_steps: &'a [DescentStep],
    last_steps: &'a [DescentStep],
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Tree {
            data,
            classes,
            max_depth,
            min_samples_split,
            validation,
            output,
        } => {
            let mut dataset = read_dataset(&data)?;
            if let Some(classes) = classes {
                let selected = parse_classes(&classes)?;
                dataset = dataset
                    .select_classes(&selected)
                    .context("failed to select classes")?;
                info!(
                    ?selected,
                    n_samples = dataset.n_samples(),
                    "binary subset selected"
                );
            }
            let n_classes = dataset.class_counts().len();
            if n_classes != 2 {
                anyhow::bail!(
                    "decision tree needs exactly 2 classes, dataset has {n_classes}; pass --classes a,b"
                );
            }

            let config = DecisionTreeConfig::new()
                .with_max_depth(max_depth)
                .with_min_samples_split(min_samples_split);
            let splitter = build_splitter(&validation, cli.seed)?;
            let result = evaluate(
                || DecisionTreeClassifier::new(config.clone()),
                &dataset,
                splitter.as_ref(),
            )?;

            let tree = config
                .fit(dataset.features(), dataset.labels())
                .context("fitting on the full dataset failed")?;
            info!(
                n_nodes = tree.n_nodes(),
                depth = tree.depth(),
                "full-data tree fitted"
            );

            write_report(&output, "tree", "cv", &result)?;

            let summary = TreeOutput {
                evaluation: evaluation_output("decision_tree", &validation, &dataset, &result),
                max_depth,
                min_samples_split,
                full_fit_nodes: tree.n_nodes(),
                full_fit_leaves: tree.n_leaves(),
                full_fit_depth: tree.depth(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Command::Knn {
            data,
            k,
            metric,
            no_scale,
            validation,
            output,
        } => {
            let dataset = read_dataset(&data)?;
            let metric: Metric = metric.parse()?;
            let knn = KnnClassifier::new(k, metric)?;
            let splitter = build_splitter(&validation, cli.seed)?;

            let result = if no_scale {
                evaluate(|| knn.clone(), &dataset, splitter.as_ref())?
            } else {
                evaluate(|| Standardized::new(knn.clone()), &dataset, splitter.as_ref())?
            };
            info!(k, %metric, scaled = !no_scale, "knn evaluated");

            write_report(&output, "knn", "cv", &result)?;

            let summary = evaluation_output("knn", &validation, &dataset, &result);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Command::Bayes {
            data,
            var_smoothing,
            validation,
            output,
        } => {
            let dataset = read_dataset(&data)?;
            let splitter = build_splitter(&validation, cli.seed)?;
            let result = evaluate(
                || GaussianNb::new().with_var_smoothing(var_smoothing),
                &dataset,
                splitter.as_ref(),
            )?;

            write_report(&output, "bayes", "cv", &result)?;

            let summary = evaluation_output("gaussian_nb", &validation, &dataset, &result);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Command::Descend {
            x0,
            y0,
            learning_rate,
            epochs,
            tol,
            output,
        } => {
            let config = DescentConfig::new()
                .with_learning_rate(learning_rate)
                .with_epochs(epochs)
                .with_tol(tol);
            let result = config
                .minimize(&ShiftedQuadratic::default(), &[x0, y0])
                .context("gradient descent failed")?;

            write_report(&output, "descend", "descent", &result)?;

            let head = result.history.len().min(5);
            let tail = result.history.len().saturating_sub(5).max(head);
            let summary = DescendOutput {
                converged: result.converged,
                epochs_used: result.epochs_used(),
                point: &result.point,
                value: result.value,
                first_steps: &result.history[..head],
                last_steps: &result.history[tail..],
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

fn read_dataset(args: &DataArgs) -> Result<LabeledDataset> {
    let dataset = DatasetReader::new(&args.data)
        .with_label_column(args.label_column.as_str())
        .read()
        .context("failed to read input CSV")?;
    info!(
        n_samples = dataset.n_samples(),
        n_features = dataset.n_features(),
        classes = ?dataset.class_counts(),
        "dataset loaded"
    );
    Ok(dataset)
}

fn build_splitter(args: &ValidationArgs, seed: u64) -> Result<Box<dyn Splitter>> {
    let splitter: Box<dyn Splitter> = match args.validation.as_str() {
        "stratified" => Box::new(StratifiedKFold::new(args.n_splits)?.with_seed(seed)),
        "kfold" => Box::new(
            KFold::new(args.n_splits)?
                .with_shuffle(!args.no_shuffle)
                .with_seed(seed),
        ),
        "loo" => Box::new(LeaveOneOut),
        "holdout" => Box::new(StratifiedHoldout::new(args.test_size)?.with_seed(seed)),
        other => anyhow::bail!(
            "unknown validation scheme: {other} (expected stratified, kfold, loo, or holdout)"
        ),
    };
    Ok(splitter)
}

fn parse_classes(s: &str) -> Result<Vec<usize>> {
    let classes = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .with_context(|| format!("invalid class label \"{part}\" in --classes"))
        })
        .collect::<Result<Vec<_>>>()?;
    if classes.len() != 2 {
        anyhow::bail!("--classes needs exactly two labels, got {}", classes.len());
    }
    Ok(classes)
}

fn evaluate<C, F>(
    factory: F,
    dataset: &LabeledDataset,
    splitter: &dyn Splitter,
) -> Result<CrossValidationResult>
where
    C: Classifier,
    F: FnMut() -> C,
{
    let scorers: [&dyn Scorer; 4] = [
        &Accuracy,
        &BalancedAccuracy,
        &MacroSensitivity,
        &MacroSpecificity,
    ];
    let result = cross_validate(
        factory,
        dataset.features(),
        dataset.labels(),
        splitter,
        &scorers,
    )
    .context("cross-validation failed")?;

    if let Some(accuracy) = result.summary_for(Accuracy.name()) {
        info!(
            folds = result.folds.len(),
            mean_accuracy = accuracy.mean,
            std_accuracy = accuracy.std,
            "cross-validation complete"
        );
    }
    if let Some(matrix) = &result.confusion_matrix {
        info!("pooled confusion matrix\n{matrix}");
    }
    Ok(result)
}

fn evaluation_output<'a>(
    model: &'static str,
    validation: &'a ValidationArgs,
    dataset: &LabeledDataset,
    result: &'a CrossValidationResult,
) -> EvaluateOutput<'a> {
    EvaluateOutput {
        model,
        validation: &validation.validation,
        n_samples: dataset.n_samples(),
        n_features: dataset.n_features(),
        class_counts: dataset.class_counts(),
        n_folds: result.folds.len(),
        summary: &result.summary,
        confusion_matrix: result.confusion_matrix.as_ref().map(|m| m.as_rows()),
    }
}

/// Writes `report` as `{experiment}_{kind}.json` when `--output-dir` is set.
fn write_report<T: Serialize>(
    output: &OutputArgs,
    default_experiment: &str,
    kind: &str,
    report: &T,
) -> Result<()> {
    let Some(dir) = &output.output_dir else {
        return Ok(());
    };
    let experiment = output
        .experiment
        .clone()
        .unwrap_or_else(|| default_experiment.to_string());
    let writer = ReportWriter::new(dir, ExperimentName::new(experiment)?)?;
    let path = writer
        .write_artifact(kind, report)
        .context("failed to write report")?;
    info!(path = %path.display(), "report saved");
    Ok(())
}
