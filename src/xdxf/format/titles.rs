//! Lookup key expansion for article titles.
//!
//! A title (`k`) may contain optional segments (`opt`). Every subset of the
//! optional segments yields one variant, so a title with `n` segments gives
//! `2^n` keys. Variants are not de-duplicated.

use crate::xdxf::types::element::Element;

/// Computes every key of an article from its direct `k` children.
///
/// Returns an empty list when the article has no title element.
pub fn expand_article(article: &Element) -> Vec<String> {
    article
        .children_named("k")
        .flat_map(expand_title)
        .collect()
}

/// Computes every variant of a single title element.
///
/// Variants are grouped by the number of included segments (0 first), and
/// within a group ordered lexicographically by segment index.
pub fn expand_title(title: &Element) -> Vec<String> {
    let n_opts = title.children_named("opt").count();
    let mut variants = Vec::with_capacity(1 << n_opts.min(16));
    for size in 0..=n_opts {
        for chosen in Combinations::new(n_opts, size) {
            variants.push(render_variant(title, &chosen));
        }
    }
    variants
}

/// Builds one title string with the given optional segments included.
///
/// Numbering markers contribute their tail only. An excluded optional
/// segment still contributes its tail.
fn render_variant(title: &Element, chosen: &[usize]) -> String {
    let mut out = title.text.clone();
    let mut opt_index = 0;
    for child in &title.children {
        match child.name.as_str() {
            "nu" => out.push_str(&child.tail),
            "opt" => {
                if chosen.contains(&opt_index) {
                    out.push_str(&child.text);
                }
                out.push_str(&child.tail);
                opt_index += 1;
            }
            _ => {}
        }
    }
    out
}

/// Lexicographic `size`-combinations of `0..n`.
struct Combinations {
    n: usize,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    fn new(n: usize, size: usize) -> Self {
        Self {
            n,
            indices: (0..size).collect(),
            started: false,
            done: size > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }

        // Find the rightmost position that has not reached its maximum.
        let size = self.indices.len();
        let mut i = size;
        loop {
            if i == 0 {
                self.done = true;
                return None;
            }
            i -= 1;
            if self.indices[i] < self.n - size + i {
                break;
            }
        }
        self.indices[i] += 1;
        for j in i + 1..size {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(self.indices.clone())
    }
}
