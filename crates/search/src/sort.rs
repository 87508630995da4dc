//! Ordering of the filtered set.

use crate::filter_spec::SortMode;
use catalog::ImageRecord;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::Arc;

/// Reorder `images` in place according to `mode`.
///
/// `seed` is only consulted by [`SortMode::Random`].
pub fn sort_images(images: &mut [Arc<ImageRecord>], mode: SortMode, seed: u64) {
    match mode {
        SortMode::Relevance => {}
        SortMode::Popular => {
            // sort_by is stable: equal popularity keeps source order
            images.sort_by(|a, b| b.popularity().cmp(&a.popularity()));
        }
        SortMode::Newest => sort_newest(images),
        SortMode::Random => {
            let mut rng = StdRng::seed_from_u64(seed);
            images.shuffle(&mut rng);
        }
    }
}

/// Newest first, without moving undated images.
///
/// ## Algorithm
/// 1. Remember the positions holding a dated image
/// 2. Stable-sort just the dated images, newest first
/// 3. Write them back into the same positions
///
/// Undated images therefore keep both their position and their relative
/// order; they are not pushed to either end.
fn sort_newest(images: &mut [Arc<ImageRecord>]) {
    let slots: Vec<usize> = images
        .iter()
        .enumerate()
        .filter(|(_, image)| image.date_added.is_some())
        .map(|(idx, _)| idx)
        .collect();

    let mut dated: Vec<Arc<ImageRecord>> = slots.iter().map(|&idx| images[idx].clone()).collect();
    dated.sort_by(|a, b| b.date_added.cmp(&a.date_added));

    for (slot, image) in slots.into_iter().zip(dated) {
        images[slot] = image;
    }
}
