//! Adaptive document chunking.
//!
//! Two strategies, selected by content type: a recursive separator-escalation
//! splitter for prose, and a paragraph splitter for extractions that keep
//! structural breaks (PDF, DOCX, spreadsheets). Both respect a configured
//! size bound and overlap, measured in characters.

use super::ContentType;
use super::types::{Chunk, ChunkInfo, ChunkMethod, Document};

/// Separator escalation order for the recursive strategy: paragraph break,
/// line break, sentence punctuation, clause punctuation, whitespace. A hard
/// character cut is the final fallback, so the size bound always holds.
const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", ". ", "! ", "? ", "; ", ", ", " "];

/// Separators used inside an oversize paragraph (everything below the
/// paragraph break).
const PARAGRAPH_REST: &[&str] = &["\n", ". ", "! ", "? ", "; ", ", ", " "];

/// Language tags with dedicated separator sets. The sets currently coincide
/// with the default; a known tag still flips the language-aware flag recorded
/// on each chunk.
const LANGUAGE_SEPARATORS: &[(&str, &[&str])] = &[
    ("english", DEFAULT_SEPARATORS),
    ("spanish", DEFAULT_SEPARATORS),
    ("french", DEFAULT_SEPARATORS),
    ("german", DEFAULT_SEPARATORS),
    ("portuguese", DEFAULT_SEPARATORS),
    ("italian", DEFAULT_SEPARATORS),
    ("bosnian", DEFAULT_SEPARATORS),
];

#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    #[error("invalid chunker config: overlap {chunk_overlap} must be smaller than size {chunk_size}")]
    InvalidConfig {
        chunk_size: usize,
        chunk_overlap: usize,
    },
}

#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared between adjacent chunks of one document.
    pub chunk_overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl ChunkerConfig {
    fn validate(&self) -> Result<(), ChunkError> {
        if self.chunk_size == 0 || self.chunk_overlap >= self.chunk_size {
            return Err(ChunkError::InvalidConfig {
                chunk_size: self.chunk_size,
                chunk_overlap: self.chunk_overlap,
            });
        }
        Ok(())
    }
}

pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if the overlap is not smaller
    /// than the chunk size.
    pub fn new(config: ChunkerConfig) -> Result<Self, ChunkError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Chunk a batch with the strategy suited to its content type.
    ///
    /// PDF, DOCX, and tabular extractions keep their structural breaks, so
    /// they go through the paragraph splitter; prose and unknown content use
    /// the recursive splitter. All-or-nothing over the batch; an empty batch
    /// yields an empty chunk list.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] for an invalid size/overlap pair.
    pub fn chunk(
        &self,
        documents: &[Document],
        content_type: ContentType,
        language: Option<&str>,
    ) -> Result<Vec<Chunk>, ChunkError> {
        match content_type {
            ContentType::Pdf | ContentType::Docx | ContentType::Excel | ContentType::Csv => {
                tracing::debug!(?content_type, "using paragraph chunking");
                self.chunk_by_paragraphs(documents, language)
            }
            ContentType::Text | ContentType::Markdown | ContentType::Unknown => {
                tracing::debug!(?content_type, "using recursive character chunking");
                self.chunk_recursive(documents, language)
            }
        }
    }

    /// Recursive separator-escalation chunking.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] for an invalid size/overlap pair.
    pub fn chunk_recursive(
        &self,
        documents: &[Document],
        language: Option<&str>,
    ) -> Result<Vec<Chunk>, ChunkError> {
        self.config.validate()?;
        let (separators, language_aware) = resolve_separators(language);

        let mut chunks = Vec::new();
        for document in documents {
            let pieces = split_recursive(
                &document.content,
                separators,
                self.config.chunk_size,
                self.config.chunk_overlap,
            );
            self.collect(
                &mut chunks,
                document,
                pieces,
                ChunkMethod::RecursiveCharacter,
                language,
                language_aware,
            );
        }
        tracing::debug!(
            documents = documents.len(),
            chunks = chunks.len(),
            "recursive chunking done"
        );
        Ok(chunks)
    }

    /// Paragraph chunking: one chunk per blank-line-delimited paragraph.
    ///
    /// Paragraphs are never merged, so structural boundaries survive; an
    /// oversize paragraph falls through to the recursive splitter without the
    /// paragraph separator.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] for an invalid size/overlap pair.
    pub fn chunk_by_paragraphs(
        &self,
        documents: &[Document],
        language: Option<&str>,
    ) -> Result<Vec<Chunk>, ChunkError> {
        self.config.validate()?;
        let (_, language_aware) = resolve_separators(language);

        let mut chunks = Vec::new();
        for document in documents {
            let mut pieces = Vec::new();
            for paragraph in document.content.split("\n\n") {
                let paragraph = paragraph.trim();
                if paragraph.is_empty() {
                    continue;
                }
                if char_len(paragraph) <= self.config.chunk_size {
                    pieces.push(paragraph.to_owned());
                } else {
                    pieces.extend(split_recursive(
                        paragraph,
                        PARAGRAPH_REST,
                        self.config.chunk_size,
                        self.config.chunk_overlap,
                    ));
                }
            }
            self.collect(
                &mut chunks,
                document,
                pieces,
                ChunkMethod::Paragraph,
                language,
                language_aware,
            );
        }
        tracing::debug!(
            documents = documents.len(),
            chunks = chunks.len(),
            "paragraph chunking done"
        );
        Ok(chunks)
    }

    fn collect(
        &self,
        out: &mut Vec<Chunk>,
        document: &Document,
        pieces: Vec<String>,
        method: ChunkMethod,
        language: Option<&str>,
        language_aware: bool,
    ) {
        for (index, content) in pieces.into_iter().enumerate() {
            let info = ChunkInfo {
                length: char_len(&content),
                method,
                chunk_size: self.config.chunk_size,
                chunk_overlap: self.config.chunk_overlap,
                language: language.unwrap_or("unknown").to_owned(),
                language_aware,
            };
            out.push(Chunk {
                content,
                metadata: document.metadata.clone(),
                index,
                info,
            });
        }
    }
}

fn resolve_separators(language: Option<&str>) -> (&'static [&'static str], bool) {
    if let Some(tag) = language
        && let Some((_, separators)) = LANGUAGE_SEPARATORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(tag))
    {
        return (separators, true);
    }
    (DEFAULT_SEPARATORS, false)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split `text` into pieces no longer than `chunk_size` characters.
///
/// Splits on the coarsest separator present, recursing into finer separators
/// only for pieces that still exceed the bound; pieces that fit are merged
/// back up toward the bound with trailing overlap. When no separator is left,
/// the text is cut into exact character windows with step
/// `chunk_size - chunk_overlap`.
fn split_recursive(
    text: &str,
    separators: &[&str],
    chunk_size: usize,
    chunk_overlap: usize,
) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if char_len(text) <= chunk_size {
        return vec![text.to_owned()];
    }

    let Some((separator, rest)) = first_present(text, separators) else {
        return split_chars(text, chunk_size, chunk_overlap);
    };

    let mut out = Vec::new();
    let mut pending: Vec<String> = Vec::new();

    for piece in split_keeping(text, separator) {
        if char_len(&piece) <= chunk_size {
            pending.push(piece);
        } else {
            if !pending.is_empty() {
                merge_pieces(&mut out, &pending, chunk_size, chunk_overlap);
                pending.clear();
            }
            out.extend(split_recursive(&piece, rest, chunk_size, chunk_overlap));
        }
    }
    if !pending.is_empty() {
        merge_pieces(&mut out, &pending, chunk_size, chunk_overlap);
    }

    out
}

/// First separator that occurs in `text`, plus the finer separators after it.
fn first_present<'a>(text: &str, separators: &'a [&str]) -> Option<(&'a str, &'a [&'a str])> {
    separators
        .iter()
        .position(|sep| text.contains(sep))
        .map(|i| (separators[i], &separators[i + 1..]))
}

/// Split on `separator`, keeping the separator attached to the preceding
/// piece so merged chunks reassemble the original text exactly.
fn split_keeping(text: &str, separator: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        let end = idx + separator.len();
        pieces.push(text[start..end].to_owned());
        start = end;
    }
    if start < text.len() {
        pieces.push(text[start..].to_owned());
    }
    pieces
}

/// Merge pieces into chunks, respecting size and overlap. Overlap is rebuilt
/// from whole trailing pieces, capped so a chunk never exceeds the bound.
fn merge_pieces(out: &mut Vec<String>, pieces: &[String], chunk_size: usize, chunk_overlap: usize) {
    let lengths: Vec<usize> = pieces.iter().map(|p| char_len(p)).collect();

    let mut current = String::new();
    let mut current_len = 0;
    // Sliding window: indices of the pieces contributing to the current chunk.
    let mut window_start = 0;

    for (idx, piece) in pieces.iter().enumerate() {
        if current_len > 0 && current_len + lengths[idx] > chunk_size {
            out.push(std::mem::take(&mut current));

            // Rebuild overlap from trailing pieces, walking backwards.
            let mut overlap_len = 0;
            let mut overlap_start = idx;
            for i in (window_start..idx).rev() {
                if overlap_len + lengths[i] > chunk_overlap
                    || overlap_len + lengths[i] + lengths[idx] > chunk_size
                {
                    break;
                }
                overlap_len += lengths[i];
                overlap_start = i;
            }
            for p in &pieces[overlap_start..idx] {
                current.push_str(p);
            }
            current_len = overlap_len;
            window_start = overlap_start;
        }

        current.push_str(piece);
        current_len += lengths[idx];
    }

    if !current.is_empty() {
        out.push(current);
    }
}

/// Exact character windows with step `chunk_size - chunk_overlap`. Final
/// fallback when no separator is available; guarantees the size bound even
/// for a single unbroken token.
fn split_chars(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let step = chunk_size.saturating_sub(chunk_overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}
