/// Split text into provider-sized batches that respect sentence
/// boundaries. Text without sentence punctuation falls back to a
/// character split so no batch ever exceeds `max_batch_size`.
pub fn split_into_batches(text: &str, max_batch_size: usize) -> Vec<String> {
    if text.len() <= max_batch_size {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current_batch = String::new();

    // Split on sentence-ending punctuation
    let sentence_pattern = regex::Regex::new(r"([.!?]+\s+)").unwrap();
    let mut last_end = 0;

    for mat in sentence_pattern.find_iter(text) {
        let sentence = &text[last_end..mat.end()];

        if !current_batch.is_empty() && current_batch.len() + sentence.len() > max_batch_size {
            batches.push(current_batch.trim().to_string());
            current_batch = String::new();
        }

        current_batch.push_str(sentence);
        last_end = mat.end();
    }

    // Handle remaining text after last sentence boundary
    if last_end < text.len() {
        let remaining = &text[last_end..];

        if !current_batch.is_empty() && current_batch.len() + remaining.len() > max_batch_size {
            batches.push(current_batch.trim().to_string());
            current_batch = String::new();
        }

        // Remaining text with no boundaries at all gets a hard character split
        if remaining.len() > max_batch_size {
            let chars: Vec<char> = remaining.chars().collect();
            for chunk in chars.chunks(max_batch_size) {
                batches.push(chunk.iter().collect());
            }
        } else {
            current_batch.push_str(remaining);
        }
    }

    if !current_batch.is_empty() {
        batches.push(current_batch.trim().to_string());
    }

    batches
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = 3000;

    #[test]
    fn test_small_text_is_a_single_batch() {
        let text = "This is a short text.";
        let batches = split_into_batches(text, MAX);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0], text);
    }

    #[test]
    fn test_batches_respect_max_size() {
        let sentence = "This is a sentence. ";
        let text = sentence.repeat(200); // > 3000 chars
        let batches = split_into_batches(&text, MAX);

        assert!(batches.len() > 1, "text should be split into multiple batches");
        for batch in &batches {
            assert!(
                batch.len() <= MAX,
                "batch size {} exceeds limit {}",
                batch.len(),
                MAX
            );
        }
    }

    #[test]
    fn test_no_punctuation_falls_back_to_character_split() {
        let text = "a".repeat(MAX + 500);
        let batches = split_into_batches(&text, MAX);

        assert!(batches.len() >= 2);
        for (i, batch) in batches.iter().enumerate() {
            assert!(batch.len() <= MAX, "batch {} has length {}", i, batch.len());
        }
    }

    #[test]
    fn test_content_is_preserved_across_batches() {
        let sentence = "This is sentence number X. ";
        let text = sentence.repeat(200);
        let batches = split_into_batches(&text, MAX);

        let reconstructed = batches.join(" ");
        let original_words = text.split_whitespace().count();
        let reconstructed_words = reconstructed.split_whitespace().count();
        assert_eq!(original_words, reconstructed_words);
    }

    #[test]
    fn test_exactly_max_size_is_one_batch() {
        let text = "a".repeat(MAX);
        let batches = split_into_batches(&text, MAX);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), MAX);
    }

    #[test]
    fn test_one_over_max_size_splits() {
        let text = "a".repeat(MAX + 1);
        let batches = split_into_batches(&text, MAX);
        assert!(batches.len() >= 2);
    }
}
