//! Property tests for fixed-size chunking.

use portfolio_rag::chunking::{Chunker, FixedSizeChunker};
use portfolio_rag::document::Document;
use proptest::prelude::*;

/// Generate arbitrary text, including multi-byte characters, with a
/// bounded character count.
fn arb_text(max_chars: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<char>(), 0..max_chars).prop_map(String::from_iter)
}

/// **Property: chunking is a partition of the input**
/// *For any* document text and chunk size, concatenating the chunk texts
/// in order SHALL reproduce the input exactly, with no gaps, overlaps,
/// or reordering.
mod prop_chunking_partitions_input {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn concatenation_reproduces_input(
            text in arb_text(300),
            chunk_size in 1usize..50,
        ) {
            let chunker = FixedSizeChunker::new(chunk_size);
            let chunks = chunker.chunk(&Document::new("doc", text.clone()));

            let rebuilt: String = chunks.iter().map(|c| c.text.as_str()).collect();
            prop_assert_eq!(rebuilt, text);
        }
    }
}

/// **Property: chunk sizes are uniform**
/// *For any* document text and chunk size, every chunk except the last
/// SHALL contain exactly `chunk_size` characters, and the last SHALL
/// contain between 1 and `chunk_size` characters.
mod prop_chunk_sizes_uniform {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn all_but_last_are_exactly_chunk_size(
            text in arb_text(300),
            chunk_size in 1usize..50,
        ) {
            let chunker = FixedSizeChunker::new(chunk_size);
            let chunks = chunker.chunk(&Document::new("doc", text.clone()));

            if text.is_empty() {
                prop_assert!(chunks.is_empty());
                return Ok(());
            }

            let last = chunks.len() - 1;
            for (i, chunk) in chunks.iter().enumerate() {
                let chars = chunk.text.chars().count();
                if i < last {
                    prop_assert_eq!(chars, chunk_size, "chunk {} has {} chars", i, chars);
                } else {
                    prop_assert!(chars >= 1 && chars <= chunk_size);
                }
            }
        }
    }
}

/// **Property: chunk ids are sequential**
/// *For any* document, chunk ids SHALL be `{document_id}-{index}` with
/// zero-based indexes in order of appearance.
mod prop_chunk_ids_sequential {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn ids_follow_index_order(
            text in arb_text(300),
            chunk_size in 1usize..50,
        ) {
            let chunker = FixedSizeChunker::new(chunk_size);
            let chunks = chunker.chunk(&Document::new("resume", text));

            for (i, chunk) in chunks.iter().enumerate() {
                prop_assert_eq!(&chunk.id, &format!("resume-{i}"));
            }
        }
    }
}
