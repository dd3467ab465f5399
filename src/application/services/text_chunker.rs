use std::str::FromStr;

/// How extracted prose is cut into chunks before embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkingStrategy {
    /// Accumulate whole words until the chunk reaches the target size.
    FixedSize,
    /// Split on paragraph, line, word and finally character boundaries so
    /// that no chunk exceeds the target size.
    Recursive,
}

impl FromStr for ChunkingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" | "fixed_size" => Ok(ChunkingStrategy::FixedSize),
            "recursive" | "semantic" => Ok(ChunkingStrategy::Recursive),
            other => Err(format!("Unknown chunking strategy: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextChunker {
    strategy: ChunkingStrategy,
    chunk_size: usize,
    separators: Vec<&'static str>,
}

impl TextChunker {
    pub fn new(strategy: ChunkingStrategy, chunk_size: usize) -> Self {
        Self {
            strategy,
            chunk_size: chunk_size.max(1),
            separators: vec!["\n\n", "\n", " "],
        }
    }

    /// Chunks of `text` in reading order. Blank chunks are dropped.
    pub fn split(&self, text: &str) -> Vec<String> {
        let chunks = match self.strategy {
            ChunkingStrategy::FixedSize => self.split_fixed(text),
            ChunkingStrategy::Recursive => self.split_recursive(text, 0),
        };

        chunks
            .into_iter()
            .filter(|chunk| !chunk.trim().is_empty())
            .collect()
    }

    fn split_fixed(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_size = 0;

        for word in text.split_whitespace() {
            current.push(word);
            current_size += word.chars().count() + 1;

            if current_size >= self.chunk_size {
                chunks.push(current.join(" "));
                current.clear();
                current_size = 0;
            }
        }

        if !current.is_empty() {
            chunks.push(current.join(" "));
        }

        chunks
    }

    fn split_recursive(&self, text: &str, separator_index: usize) -> Vec<String> {
        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }

        let Some(&separator) = self.separators.get(separator_index) else {
            return self.split_by_length(text);
        };

        let parts: Vec<&str> = text.split(separator).collect();
        if parts.len() == 1 {
            return self.split_recursive(text, separator_index + 1);
        }

        let mut chunks = Vec::new();
        let mut current = String::new();

        for part in parts {
            let candidate = if current.is_empty() {
                part.to_string()
            } else {
                format!("{}{}{}", current, separator, part)
            };

            if char_len(&candidate) <= self.chunk_size {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }

            if char_len(part) > self.chunk_size {
                chunks.extend(self.split_recursive(part, separator_index + 1));
            } else {
                current = part.to_string();
            }
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }

    fn split_by_length(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        chars
            .chunks(self.chunk_size)
            .map(|window| window.iter().collect())
            .collect()
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
