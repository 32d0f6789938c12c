//! Skipgram CLI - matrix engine and word embeddings
//!
//! Command-line interface for training and querying skip-gram embeddings.

use clap::{Parser, Subcommand};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use log::error;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skipgram::{EmbeddingSet, Matrix, Result, TrainingConfig, Word2Vec, SAMPLE_CORPUS};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "skipgram")]
#[command(author = "Skipgram Contributors")]
#[command(version)]
#[command(about = "Dense matrix engine and skip-gram word embeddings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on the built-in sample corpus and show nearest neighbours
    Demo {
        /// Output prefix for <prefix>.vocab and <prefix>.weights
        #[arg(short, long, default_value = "word2vec_embeddings")]
        output: PathBuf,

        /// Number of epochs
        #[arg(short, long, default_value = "50")]
        epochs: usize,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Train embeddings from a corpus file
    Train {
        /// Input corpus file
        #[arg(short, long)]
        input: PathBuf,

        /// Output prefix for <prefix>.vocab and <prefix>.weights
        #[arg(short, long)]
        output: PathBuf,

        /// Embedding dimension
        #[arg(short, long, default_value = "100")]
        dimension: usize,

        /// Context window on each side of the target
        #[arg(short, long, default_value = "5")]
        window: usize,

        /// Negative samples per pair
        #[arg(short, long, default_value = "5")]
        negative: usize,

        /// Disable negative sampling
        #[arg(long)]
        no_negative_sampling: bool,

        /// Learning rate
        #[arg(short, long, default_value = "0.025")]
        learning_rate: f64,

        /// Number of epochs
        #[arg(short, long, default_value = "10")]
        epochs: usize,

        /// Minimum word count
        #[arg(short, long, default_value = "2")]
        min_count: usize,

        /// Subsampling threshold
        #[arg(long, default_value = "0.001")]
        subsample: f64,

        /// Also write the word vectors in text format to this file
        #[arg(long)]
        text_output: Option<PathBuf>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Find similar words
    Similar {
        /// Embedding prefix to use
        #[arg(short, long)]
        model: PathBuf,

        /// Word to find similar words for
        word: String,

        /// Number of results
        #[arg(short = 'k', long, default_value = "10")]
        count: usize,
    },

    /// Show embedding information
    Info {
        /// Embedding prefix to inspect
        #[arg(short, long)]
        model: PathBuf,
    },

    /// Time blocked against sequential matrix multiplication
    BenchMatmul {
        /// Side length of the square operands
        #[arg(short, long, default_value = "512")]
        size: usize,

        /// Random seed for the operands
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let result = match cli.command {
        Commands::Demo {
            output,
            epochs,
            seed,
        } => run_demo(output, epochs, seed),

        Commands::Train {
            input,
            output,
            dimension,
            window,
            negative,
            no_negative_sampling,
            learning_rate,
            epochs,
            min_count,
            subsample,
            text_output,
            seed,
        } => {
            let config = TrainingConfig {
                embedding_dim: dimension,
                window_size: window,
                negative_samples: negative,
                learning_rate,
                epochs,
                min_count,
                subsample_threshold: subsample,
                use_negative_sampling: !no_negative_sampling,
                seed,
            };
            train_embeddings(input, output, text_output, config)
        }

        Commands::Similar { model, word, count } => find_similar(model, word, count),

        Commands::Info { model } => show_info(model),

        Commands::BenchMatmul { size, seed } => bench_matmul(size, seed),
    };

    if let Err(e) = result {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} epochs ETA: {eta}")
        .map(|style| style.progress_chars("█▓▒░  "))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn run_demo(output: PathBuf, epochs: usize, seed: Option<u64>) -> Result<()> {
    println!("=== Skip-gram Demo ===");

    let config = TrainingConfig {
        embedding_dim: 128,
        window_size: 5,
        negative_samples: 5,
        learning_rate: 0.025,
        epochs,
        min_count: 1,
        seed,
        ..TrainingConfig::default()
    };

    let mut model = Word2Vec::<f32>::new(config)?;
    model.load_corpus(SAMPLE_CORPUS);
    model.prepare_training_data();
    println!("✓ Vocabulary size: {} words", model.vocab_size());

    let start_time = Instant::now();
    let pb = ProgressBar::new(epochs as u64);
    pb.set_style(bar_style());
    pb.set_message("Training skip-gram model...");
    let reports = model.train_with_progress(Some(&pb))?;
    pb.finish_and_clear();

    if let Some(last) = reports.last() {
        println!("✓ Final loss: {:.6}", last.average_loss);
    }
    println!("✓ Training completed in {}", HumanDuration(start_time.elapsed()));

    println!();
    println!("=== Word Similarity Tests ===");
    for word in ["fox", "dog", "learning", "the"] {
        println!();
        println!("Most similar to '{}':", word);
        match model.most_similar(word, 5) {
            Ok(similar) => {
                for (similar_word, score) in similar {
                    println!("  {}: {:.4}", similar_word, score);
                }
            }
            Err(e) => println!("  Error: {}", e),
        }
    }

    println!();
    model.save_embeddings(&output)?;
    println!(
        "✓ Saved to {} and {}",
        EmbeddingSet::<f32>::vocab_path(&output).display(),
        EmbeddingSet::<f32>::weights_path(&output).display()
    );

    Ok(())
}

fn train_embeddings(
    input: PathBuf,
    output: PathBuf,
    text_output: Option<PathBuf>,
    config: TrainingConfig,
) -> Result<()> {
    let start_time = Instant::now();

    println!("Skipgram Embedding Trainer");
    println!("   Training from: {}", input.display());
    println!();

    let epochs = config.epochs;
    let dim = config.embedding_dim;
    let mut model = Word2Vec::<f32>::new(config)?;

    let tokens = model.load_corpus_from_file(&input)?;
    println!("✓ Loaded {} tokens", format_number(tokens));

    model.prepare_training_data();
    println!(
        "✓ Vocabulary: {} words, {} training sentences",
        format_number(model.vocab_size()),
        format_number(model.sentences().len())
    );

    let pb = ProgressBar::new(epochs as u64);
    pb.set_style(bar_style());
    pb.set_message(format!("Training {}-dim embeddings...", dim));
    let reports = model.train_with_progress(Some(&pb))?;
    pb.finish_and_clear();

    for report in &reports {
        println!("  {}", report);
    }

    model.save_embeddings(&output)?;
    println!("✓ Saved embeddings to {}.{{vocab,weights}}", output.display());

    if let Some(path) = text_output {
        model.save_text_format(&path)?;
        println!("✓ Saved word vectors to {}", path.display());
    }

    println!();
    println!("Done in {}", HumanDuration(start_time.elapsed()));
    Ok(())
}

fn find_similar(model_prefix: PathBuf, word: String, count: usize) -> Result<()> {
    let mut model = Word2Vec::<f32>::new(TrainingConfig::default())?;
    model.load_embeddings(&model_prefix)?;
    let similar = model.most_similar(&word.to_lowercase(), count)?;

    println!("Words similar to '{}':", word);
    for (i, (similar_word, score)) in similar.iter().enumerate() {
        println!("  {}. {} ({:.4})", i + 1, similar_word, score);
    }

    Ok(())
}

fn show_info(model_prefix: PathBuf) -> Result<()> {
    let set = EmbeddingSet::<f32>::load(&model_prefix)?;

    println!("Embeddings: {:?}", model_prefix);
    println!("  Vocabulary size: {}", format_number(set.vocab.len()));
    println!("  Embedding dimension: {}", set.embedding_dim());
    println!("  Parameters: {}", format_number(set.target.len() + set.context.len()));

    Ok(())
}

fn bench_matmul(size: usize, seed: u64) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut a = Matrix::<f32>::new(size, size);
    a.random_init(&mut rng);
    let mut b = Matrix::<f32>::new(size, size);
    b.random_init(&mut rng);

    println!("Multiplying two {}x{} matrices", size, size);

    let start = Instant::now();
    let blocked = a.matmul(&b)?;
    let blocked_time = start.elapsed();
    println!("  blocked (parallel): {:?}", blocked_time);

    let start = Instant::now();
    let sequential = a.mult_sequential(&b)?;
    let sequential_time = start.elapsed();
    println!("  sequential:         {:?}", sequential_time);

    let identical = blocked == sequential;
    println!("  results identical:  {}", identical);
    if blocked_time.as_secs_f64() > 0.0 {
        println!(
            "  speedup:            {:.2}x",
            sequential_time.as_secs_f64() / blocked_time.as_secs_f64()
        );
    }

    Ok(())
}

fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
