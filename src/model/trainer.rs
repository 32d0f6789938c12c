//! Skip-gram training with negative sampling.

use crate::config::{Config, TextConfig, TrainingConfig};
use crate::error::{Result, SkipgramError};
use crate::matrix::{sigmoid, Float, Matrix};
use crate::model::EpochReport;
use crate::sampler::Sampler;
use crate::similarity::{dot, normalize_in_place, rank_by_similarity, UnitQueryCosine};
use crate::storage::{EmbeddingSet, WordVectorFormat};
use crate::text::Tokenizer;
use crate::vocab::Vocabulary;
use indicatif::ProgressBar;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Default embedding dimension for word vectors.
pub const DEFAULT_EMBEDDING_DIM: usize = 100;

/// Added inside the logarithms of the loss so a saturated sigmoid stays finite.
const LOSS_EPSILON: f64 = 1e-10;

/// Skip-gram embedding trainer.
///
/// The usual sequence is [`load_corpus`](Self::load_corpus),
/// [`prepare_training_data`](Self::prepare_training_data), then
/// [`train`](Self::train); afterwards the tables can be queried with
/// [`most_similar`](Self::most_similar) or persisted with
/// [`save_embeddings`](Self::save_embeddings).
///
/// Training is strictly sequential online SGD: every update is visible to the
/// next pair, so a fixed seed reproduces the tables bit for bit.
pub struct Word2Vec<T: Float = f32> {
    sampler: Sampler,
    config: TrainingConfig,
    tokenizer: Tokenizer,
    rng: ChaCha8Rng,
    corpus: Vec<String>,
    vocab: Vocabulary,
    sentences: Vec<Vec<usize>>,
    target: Matrix<T>,
    context: Matrix<T>,
}

impl<T: Float> Word2Vec<T> {
    /// Creates a trainer seeded from `config.seed`, or from entropy.
    pub fn new(config: TrainingConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Creates a trainer drawing from `rng`; `config.seed` is ignored.
    pub fn with_rng(config: TrainingConfig, rng: ChaCha8Rng) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            sampler: Sampler::new(config.subsample_threshold),
            config,
            tokenizer: Tokenizer::default_config(),
            rng,
            corpus: Vec::new(),
            vocab: Vocabulary::new(),
            sentences: Vec::new(),
            target: Matrix::empty(),
            context: Matrix::empty(),
        })
    }

    /// Creates a trainer from the combined training and tokenizer configuration.
    pub fn from_config(config: Config) -> Result<Self> {
        Ok(Self::new(config.training)?.with_text_config(config.text))
    }

    /// Replaces the corpus tokenizer settings.
    pub fn with_text_config(mut self, text: TextConfig) -> Self {
        self.tokenizer = Tokenizer::new(text);
        self
    }

    /// Tokenizes `text` and makes it the corpus, replacing any previous one.
    ///
    /// Returns the number of tokens.
    pub fn load_corpus(&mut self, text: &str) -> usize {
        self.corpus = self.tokenizer.tokenize(text);
        info!("Loaded corpus: {} tokens", self.corpus.len());
        self.corpus.len()
    }

    /// Like [`load_corpus`](Self::load_corpus), reading the whole stream.
    ///
    /// On a read error the previous corpus is kept.
    pub fn load_corpus_from_reader<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        self.corpus = self.tokenizer.tokenize_reader(reader)?;
        info!("Loaded corpus: {} tokens", self.corpus.len());
        Ok(self.corpus.len())
    }

    /// Like [`load_corpus`](Self::load_corpus), reading a file.
    pub fn load_corpus_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!("Reading corpus from {}", path.display());
        self.load_corpus_from_reader(BufReader::new(file))
    }

    /// Builds the vocabulary from the corpus and subsamples it into sentences.
    ///
    /// Any existing embedding tables are dropped since their rows no longer
    /// match the new index space.
    pub fn prepare_training_data(&mut self) {
        self.vocab.build(&self.corpus, self.config.min_count);
        self.sentences = self
            .sampler
            .subsample(&self.vocab, &self.corpus, &mut self.rng);
        self.target = Matrix::empty();
        self.context = Matrix::empty();

        let kept: usize = self.sentences.iter().map(Vec::len).sum();
        info!(
            "Prepared {} training sentences ({} of {} tokens kept after subsampling)",
            self.sentences.len(),
            kept,
            self.corpus.len()
        );
    }

    /// Allocates both tables, `vocab_size x embedding_dim`, uniform in
    /// `[-0.5/dim, 0.5/dim)`.
    pub fn initialize_embeddings(&mut self) -> Result<()> {
        if self.vocab.is_empty() {
            return Err(SkipgramError::VocabularyNotBuilt);
        }
        let dim = self.config.embedding_dim;
        let bound = T::from_f64(0.5 / dim as f64);

        let mut target = Matrix::new(self.vocab.len(), dim);
        target.random_uniform(&mut self.rng, -bound, bound);
        let mut context = Matrix::new(self.vocab.len(), dim);
        context.random_uniform(&mut self.rng, -bound, bound);

        self.target = target;
        self.context = context;
        debug!("Initialized {}x{} embedding tables", self.vocab.len(), dim);
        Ok(())
    }

    /// Trains for `config.epochs` epochs.
    ///
    /// Embeddings are initialized first if they do not exist yet.
    pub fn train(&mut self) -> Result<Vec<EpochReport>> {
        self.train_with_progress(None)
    }

    /// Trains like [`train`](Self::train), advancing `progress` once per epoch.
    pub fn train_with_progress(&mut self, progress: Option<&ProgressBar>) -> Result<Vec<EpochReport>> {
        if self.vocab.is_empty() {
            return Err(SkipgramError::VocabularyNotBuilt);
        }
        if self.target.is_empty() {
            self.initialize_embeddings()?;
        }
        if self.sentences.is_empty() {
            warn!("No training sentences; embeddings stay at their initial values");
        }
        if self.config.use_negative_sampling && self.vocab.len() < 2 {
            warn!("Vocabulary has a single word; no negative samples can be drawn");
        }

        let epochs = self.config.epochs;
        if let Some(pb) = progress {
            pb.set_length(epochs as u64);
        }

        let mut reports = Vec::with_capacity(epochs);
        for epoch in 1..=epochs {
            let report = self.train_epoch(epoch);
            info!("Epoch {}/{} - Loss: {}", epoch, epochs, report.average_loss);
            if let Some(pb) = progress {
                pb.set_message(format!("loss {:.4}", report.average_loss));
                pb.inc(1);
            }
            reports.push(report);
        }

        if let Some(pb) = progress {
            pb.finish_with_message("training complete");
        }
        Ok(reports)
    }

    fn train_epoch(&mut self, epoch: usize) -> EpochReport {
        let Self {
            sampler,
            config,
            rng,
            vocab,
            sentences,
            target,
            context,
            ..
        } = self;

        let dim = config.embedding_dim;
        let window = config.window_size;
        let vocab_size = vocab.len();
        let lr = T::from_f64(config.learning_rate);
        let eps = T::from_f64(LOSS_EPSILON);

        let mut t_snapshot = Vec::with_capacity(dim);
        let mut negatives = Vec::with_capacity(config.negative_samples);
        let mut total_loss = 0.0f64;
        let mut pairs = 0usize;

        for sentence in sentences.iter() {
            for (pos, &t_idx) in sentence.iter().enumerate() {
                let start = pos.saturating_sub(window);
                let end = (pos + window + 1).min(sentence.len());

                for (ctx_pos, &c_idx) in sentence.iter().enumerate().take(end).skip(start) {
                    if ctx_pos == pos {
                        continue;
                    }

                    // Every step of this pair scores against the target row as
                    // it was before the positive update.
                    t_snapshot.clear();
                    t_snapshot.extend_from_slice(table_row(target, t_idx, dim));

                    let t_row = table_row(target, t_idx, dim);
                    let c_row = table_row(context, c_idx, dim);
                    let s = update_pair(t_row, &t_snapshot, c_row, T::one(), lr);
                    total_loss -= (s + eps).ln().to_f64();
                    pairs += 1;

                    if !config.use_negative_sampling {
                        continue;
                    }
                    sampler.negative_samples_into(
                        t_idx,
                        config.negative_samples,
                        vocab_size,
                        &mut *rng,
                        &mut negatives,
                    );
                    for &n_idx in &negatives {
                        let t_row = table_row(target, t_idx, dim);
                        let n_row = table_row(context, n_idx, dim);
                        let s = update_pair(t_row, &t_snapshot, n_row, T::zero(), lr);
                        total_loss -= (T::one() - s + eps).ln().to_f64();
                    }
                    pairs += negatives.len();
                }
            }
        }

        EpochReport::new(epoch, total_loss, pairs)
    }

    /// Copy of the target vector of `word`.
    pub fn word_vector(&self, word: &str) -> Result<Vec<T>> {
        let idx = self.index_of(word)?;
        self.ensure_initialized()?;
        Ok(table_row_ref(&self.target, idx).to_vec())
    }

    /// The `top_n` words closest to `word` by cosine similarity of their
    /// target vectors, best first. `word` itself is never returned.
    pub fn most_similar(&self, word: &str, top_n: usize) -> Result<Vec<(String, T)>> {
        let idx = self.index_of(word)?;
        self.ensure_initialized()?;

        let dim = self.target.cols();
        let mut query = table_row_ref(&self.target, idx).to_vec();
        normalize_in_place(&mut query);

        let ranked = rank_by_similarity(
            &UnitQueryCosine,
            &query,
            self.target.as_slice().par_chunks(dim),
            top_n,
            |i| i == idx,
        );
        Ok(ranked
            .into_iter()
            .filter_map(|(i, score)| self.vocab.word(i).map(|w| (w.to_string(), score)))
            .collect())
    }

    /// Writes the word list and target table in the word-vector text format.
    pub fn save_text_format<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.ensure_initialized()?;
        let path = path.as_ref();
        WordVectorFormat::write_file(path, self.vocab.words(), &self.target)?;
        info!("Saved {} word vectors to {}", self.vocab.len(), path.display());
        Ok(())
    }

    /// Saves `<prefix>.vocab` (words and target table) and
    /// `<prefix>.weights` (context table).
    pub fn save_embeddings<P: AsRef<Path>>(&self, prefix: P) -> Result<()> {
        self.ensure_initialized()?;
        EmbeddingSet::save_parts(prefix, &self.vocab, &self.target, &self.context)
    }

    /// Replaces vocabulary and both tables with a set saved under `prefix`.
    ///
    /// Nothing is modified if loading fails. On success `embedding_dim`
    /// follows the loaded tables and prepared sentences are discarded.
    pub fn load_embeddings<P: AsRef<Path>>(&mut self, prefix: P) -> Result<()> {
        let set = EmbeddingSet::<T>::load(prefix)?;
        if set.embedding_dim() > 0 {
            self.config.embedding_dim = set.embedding_dim();
        }
        self.vocab = set.vocab;
        self.target = set.target;
        self.context = set.context;
        self.sentences.clear();
        Ok(())
    }

    /// Number of words in the vocabulary.
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// Width of the embedding tables.
    pub fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    /// Training configuration.
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Tokens of the loaded corpus.
    pub fn corpus(&self) -> &[String] {
        &self.corpus
    }

    /// The vocabulary.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Subsampled training sentences as vocabulary indices.
    pub fn sentences(&self) -> &[Vec<usize>] {
        &self.sentences
    }

    /// Target (input) table; empty before initialization.
    pub fn target_embeddings(&self) -> &Matrix<T> {
        &self.target
    }

    /// Context (output) table; empty before initialization.
    pub fn context_embeddings(&self) -> &Matrix<T> {
        &self.context
    }

    fn index_of(&self, word: &str) -> Result<usize> {
        self.vocab
            .index_of(word)
            .ok_or_else(|| SkipgramError::WordNotInVocabulary(word.to_string()))
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.target.rows() != self.vocab.len() || self.target.is_empty() {
            return Err(SkipgramError::EmbeddingsNotInitialized);
        }
        Ok(())
    }
}

/// One SGD step on a (target, context) pair with label 1 or 0.
///
/// The score is `sigmoid(t_snapshot . c)`. `t` accumulates `g * c` from the
/// context row before its update and `c` accumulates `g * t_snapshot`.
/// Returns the sigmoid.
#[inline]
fn update_pair<T: Float>(t: &mut [T], t_snapshot: &[T], c: &mut [T], label: T, lr: T) -> T {
    let s = sigmoid(dot(t_snapshot, c));
    let g = lr * (label - s);

    for ((ti, ci), &si) in t.iter_mut().zip(c.iter_mut()).zip(t_snapshot) {
        *ti += g * *ci;
        *ci += g * si;
    }
    s
}

// Indices come from the vocabulary the tables were sized for.
#[inline]
fn table_row<T: Float>(table: &mut Matrix<T>, idx: usize, dim: usize) -> &mut [T] {
    &mut table.as_mut_slice()[idx * dim..(idx + 1) * dim]
}

#[inline]
fn table_row_ref<T: Float>(table: &Matrix<T>, idx: usize) -> &[T] {
    let dim = table.cols();
    &table.as_slice()[idx * dim..(idx + 1) * dim]
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &str = "the quick brown fox jumps over the lazy dog \
        the dog barks at the fox and the fox runs away \
        a quick brown dog jumps over a lazy fox";

    fn config(seed: u64) -> TrainingConfig {
        TrainingConfig {
            embedding_dim: 16,
            window_size: 2,
            negative_samples: 3,
            learning_rate: 0.05,
            epochs: 5,
            min_count: 1,
            subsample_threshold: 0.0,
            use_negative_sampling: true,
            seed: Some(seed),
        }
    }

    fn trained(seed: u64) -> Word2Vec<f32> {
        let mut model = Word2Vec::<f32>::new(config(seed)).unwrap();
        model.load_corpus(CORPUS);
        model.prepare_training_data();
        model.train().unwrap();
        model
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut cfg = config(1);
        cfg.embedding_dim = 0;
        assert!(matches!(Word2Vec::<f32>::new(cfg), Err(SkipgramError::Config(_))));
    }

    #[test]
    fn test_load_corpus_normalizes() {
        let mut model = Word2Vec::<f32>::new(config(1)).unwrap();
        assert_eq!(model.load_corpus("The Fox, the DOG! 42"), 4);
        assert_eq!(model.corpus(), &["the", "fox", "the", "dog"]);

        model.load_corpus("replaced");
        assert_eq!(model.corpus(), &["replaced"]);
    }

    #[test]
    fn test_initialize_requires_vocabulary() {
        let mut model = Word2Vec::<f32>::new(config(1)).unwrap();
        assert!(matches!(
            model.initialize_embeddings(),
            Err(SkipgramError::VocabularyNotBuilt)
        ));
        assert!(matches!(model.train(), Err(SkipgramError::VocabularyNotBuilt)));
    }

    #[test]
    fn test_initialize_bounds() {
        let mut model = Word2Vec::<f64>::new(config(1)).unwrap();
        model.load_corpus(CORPUS);
        model.prepare_training_data();
        model.initialize_embeddings().unwrap();

        let bound = 0.5 / 16.0;
        let target = model.target_embeddings();
        assert_eq!(target.shape(), (model.vocab_size(), 16));
        assert_eq!(model.context_embeddings().shape(), target.shape());
        assert!(target.as_slice().iter().all(|&x| (-bound..bound).contains(&x)));
    }

    #[test]
    fn test_update_pair_uses_pre_update_vectors() {
        let mut t = vec![1.0f64, 0.0];
        let snapshot = t.clone();
        let mut c = vec![0.0f64, 1.0];
        let s = update_pair(&mut t, &snapshot, &mut c, 1.0, 0.5);

        assert_eq!(s, 0.5);
        // g = 0.5 * (1 - 0.5)
        assert_eq!(t, vec![1.0, 0.25]);
        assert_eq!(c, vec![0.25, 1.0]);
    }

    /// Hand-written epoch: the target row is copied once per pair and that
    /// copy drives the positive and every negative step.
    fn replay_pair(
        target: &mut Matrix<f64>,
        context: &mut Matrix<f64>,
        t_idx: usize,
        c_idx: usize,
        negatives: &[usize],
        lr: f64,
    ) {
        let dim = target.cols();
        let t_emb = target.row(t_idx).unwrap().to_vec();
        let c_emb = context.row(c_idx).unwrap().to_vec();

        let s = sigmoid(dot(&t_emb, &c_emb));
        let g = lr * (1.0 - s);
        for d in 0..dim {
            target[(t_idx, d)] += g * c_emb[d];
            context[(c_idx, d)] += g * t_emb[d];
        }

        for &n_idx in negatives {
            let n_emb = context.row(n_idx).unwrap().to_vec();
            let s = sigmoid(dot(&t_emb, &n_emb));
            let g = lr * (0.0 - s);
            for d in 0..dim {
                target[(t_idx, d)] += g * n_emb[d];
                context[(n_idx, d)] += g * t_emb[d];
            }
        }
    }

    #[test]
    fn test_two_word_epoch_matches_hand_replay() {
        let cfg = TrainingConfig {
            embedding_dim: 4,
            window_size: 1,
            negative_samples: 1,
            learning_rate: 0.5,
            epochs: 1,
            min_count: 1,
            subsample_threshold: 0.0,
            use_negative_sampling: true,
            seed: Some(1),
        };
        let mut model = Word2Vec::<f64>::new(cfg).unwrap();
        model.load_corpus("alpha beta");
        model.prepare_training_data();
        model.initialize_embeddings().unwrap();
        assert_eq!(model.sentences(), &[vec![0, 1]]);

        let mut target = model.target_embeddings().clone();
        let mut context = model.context_embeddings().clone();
        // With two words the only valid negative is the other word.
        replay_pair(&mut target, &mut context, 0, 1, &[1], 0.5);
        replay_pair(&mut target, &mut context, 1, 0, &[0], 0.5);

        let reports = model.train().unwrap();
        assert_eq!(reports[0].pairs, 4);
        for (a, b) in model.target_embeddings().as_slice().iter().zip(target.as_slice()) {
            assert!((a - b).abs() < 1e-12, "target {} vs {}", a, b);
        }
        for (a, b) in model.context_embeddings().as_slice().iter().zip(context.as_slice()) {
            assert!((a - b).abs() < 1e-12, "context {} vs {}", a, b);
        }
    }

    #[test]
    fn test_training_is_deterministic() {
        let a = trained(42);
        let b = trained(42);
        assert_eq!(a.target_embeddings(), b.target_embeddings());
        assert_eq!(a.context_embeddings(), b.context_embeddings());

        let c = trained(43);
        assert_ne!(a.target_embeddings(), c.target_embeddings());
    }

    #[test]
    fn test_loss_decreases() {
        let mut cfg = config(7);
        cfg.epochs = 30;
        let mut model = Word2Vec::<f32>::new(cfg).unwrap();
        model.load_corpus(CORPUS);
        model.prepare_training_data();
        let reports = model.train().unwrap();

        assert_eq!(reports.len(), 30);
        assert_eq!(reports[0].epoch, 1);
        assert!(reports.iter().all(|r| r.pairs > 0 && r.average_loss.is_finite()));
        assert!(reports[29].average_loss < reports[0].average_loss);
    }

    #[test]
    fn test_positive_only_training() {
        let mut cfg = config(3);
        cfg.use_negative_sampling = false;
        let mut model = Word2Vec::<f32>::new(cfg).unwrap();
        model.load_corpus(CORPUS);
        model.prepare_training_data();
        model.initialize_embeddings().unwrap();
        let before = model.target_embeddings().clone();

        let reports = model.train().unwrap();
        assert_ne!(model.target_embeddings(), &before);

        // Without negatives every counted pair is a positive one.
        let n = model.sentences()[0].len();
        let window = 2;
        let expected: usize = (0..n)
            .map(|p| (p + window + 1).min(n) - p.saturating_sub(window) - 1)
            .sum();
        assert_eq!(reports[0].pairs, expected);
    }

    #[test]
    fn test_word_vector() {
        let model = trained(5);
        let v = model.word_vector("fox").unwrap();
        assert_eq!(v.len(), 16);
        let idx = model.vocabulary().index_of("fox").unwrap();
        assert_eq!(v.as_slice(), model.target_embeddings().row(idx).unwrap());

        assert!(matches!(
            model.word_vector("unicorn"),
            Err(SkipgramError::WordNotInVocabulary(_))
        ));
    }

    #[test]
    fn test_queries_need_embeddings() {
        let mut model = Word2Vec::<f32>::new(config(1)).unwrap();
        model.load_corpus(CORPUS);
        model.prepare_training_data();
        assert!(matches!(
            model.most_similar("fox", 3),
            Err(SkipgramError::EmbeddingsNotInitialized)
        ));
    }

    #[test]
    fn test_most_similar() {
        let model = trained(11);
        let similar = model.most_similar("fox", 5).unwrap();

        assert_eq!(similar.len(), 5);
        assert!(similar.iter().all(|(w, _)| w != "fox"));
        for pair in similar.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
        assert!(similar.iter().all(|(_, s)| (-1.0001..=1.0001).contains(s)));

        let all = model.most_similar("fox", 1000).unwrap();
        assert_eq!(all.len(), model.vocab_size() - 1);
        assert!(model.most_similar("fox", 0).unwrap().is_empty());
    }

    #[test]
    fn test_single_word_vocabulary() {
        let mut model = Word2Vec::<f32>::new(config(2)).unwrap();
        model.load_corpus("echo echo echo echo");
        model.prepare_training_data();
        let reports = model.train().unwrap();
        // Only positives: no valid negative exists.
        assert!(reports.iter().all(|r| r.pairs == 10));
        assert!(model.most_similar("echo", 3).unwrap().is_empty());
    }

    #[test]
    fn test_prepare_drops_stale_tables() {
        let mut model = trained(9);
        model.load_corpus("completely different words here");
        model.prepare_training_data();
        assert!(model.target_embeddings().is_empty());
        assert_eq!(model.vocab_size(), 4);
    }
}
