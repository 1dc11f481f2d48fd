use std::io::BufRead;

use bindarg::{BindingParser, Choices, Record, TextFile};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Choices)]
enum Optimizer {
    Sgd,
    Adam,
    #[binding(value = "adam-w")]
    AdamW,
}

#[derive(Debug, Record)]
#[binding(name = "data")]
struct Data {
    #[binding(default_str = "-", help = "The training corpus, one example per line.")]
    corpus: TextFile,
    #[binding(default = 32, alias = "b")]
    batch_size: usize,
    #[binding(sep = ",", default = vec![0.8, 0.2], help = "The train/validation split.")]
    split: Vec<f64>,
}

#[derive(Debug, Record)]
#[binding(name = "model")]
struct Model {
    #[binding(default = Optimizer::Adam, alias = "o")]
    optimizer: Optimizer,
    #[binding(default = 0.001)]
    learning_rate: f64,
    #[binding(default = false, help = "Log every batch.")]
    verbose: bool,
    #[binding(default_str = "checkpoints")]
    output_dir: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bindarg_builder=info")),
        )
        .init();

    let (data, model) = BindingParser::for_records::<(Data, Model)>("training")
        .about("Train a model on a line-oriented corpus.")
        .epilog("The corpus is read from the standard input unless `--corpus` names a file.")
        .parse::<(Data, Model)>();
    info!(optimizer = ?model.optimizer, output_dir = model.output_dir, "training");

    let examples = data.corpus.lines().map_while(Result::ok).count();
    let batches = examples.div_ceil(data.batch_size.max(1));
    println!(
        "{examples} examples in {batches} batches, split {:?}, learning rate {}.",
        data.split, model.learning_rate
    );

    if model.verbose {
        for batch in 0..batches {
            println!("batch {batch}");
        }
    }
}
