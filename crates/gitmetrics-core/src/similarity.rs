//! Line-level text similarity.
//!
//! Scorers compare two corpora line by line and return an integer
//! percentage. Two empty texts are identical (100); an empty text against a
//! non-empty one shares nothing (0).

use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A similarity index in `0..=100`.
pub type Similarity = u8;

/// Scores above this are reported as high similarity.
pub const HIGH_SIMILARITY: Similarity = 65;

/// A deterministic text comparator.
pub trait Scorer {
    /// Short name used in logs and on the command line.
    fn name(&self) -> &'static str;

    /// Compare two texts.
    fn score(&self, a: &str, b: &str) -> Result<Similarity>;
}

/// Score with the default comparator.
pub fn score(a: &str, b: &str) -> Result<Similarity> {
    LcsRatio.score(a, b)
}

/// `2 * LCS / (|a| + |b|)` over lines. Symmetric in its arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct LcsRatio;

impl Scorer for LcsRatio {
    fn name(&self) -> &'static str {
        "lcs"
    }

    fn score(&self, a: &str, b: &str) -> Result<Similarity> {
        let (a, b) = intern_lines(a, b);
        if let Some(s) = degenerate(&a, &b) {
            return Ok(s);
        }

        // Common prefix and suffix are part of every LCS
        let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
        let suffix = a[prefix..]
            .iter()
            .rev()
            .zip(b[prefix..].iter().rev())
            .take_while(|(x, y)| x == y)
            .count();
        let a_mid = &a[prefix..a.len() - suffix];
        let b_mid = &b[prefix..b.len() - suffix];

        let d = myers_edit_distance(a_mid, b_mid);
        let lcs = prefix + suffix + (a_mid.len() + b_mid.len()).saturating_sub(d) / 2;
        Ok(to_percent(2 * lcs, a.len() + b.len()))
    }
}

/// Ratcliff/Obershelp gestalt matching over lines.
///
/// Takes the longest common run of lines, then recurses on what lies to the
/// left and to the right of it. Ties go to the earliest run in `a`, then in
/// `b`, which makes the result depend on argument order in rare cases.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatcliffObershelp;

impl Scorer for RatcliffObershelp {
    fn name(&self) -> &'static str {
        "ratcliff"
    }

    fn score(&self, a: &str, b: &str) -> Result<Similarity> {
        let (a, b) = intern_lines(a, b);
        if let Some(s) = degenerate(&a, &b) {
            return Ok(s);
        }

        let mut matcher = BlockMatcher::new(&a, &b);
        let mut matched = 0;
        let mut queue = vec![(0, a.len(), 0, b.len())];
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = matcher.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        Ok(to_percent(2 * matched, a.len() + b.len()))
    }
}

/// Available comparators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScorerKind {
    /// [`LcsRatio`]
    #[default]
    Lcs,
    /// [`RatcliffObershelp`]
    Ratcliff,
}

impl ScorerKind {
    /// Instantiate the comparator.
    pub fn scorer(&self) -> Box<dyn Scorer> {
        match self {
            ScorerKind::Lcs => Box::new(LcsRatio),
            ScorerKind::Ratcliff => Box::new(RatcliffObershelp),
        }
    }

    /// Name as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            ScorerKind::Lcs => "lcs",
            ScorerKind::Ratcliff => "ratcliff",
        }
    }
}

impl FromStr for ScorerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lcs" => Ok(ScorerKind::Lcs),
            "ratcliff" | "ratcliff-obershelp" | "gestalt" => Ok(ScorerKind::Ratcliff),
            other => Err(Error::Parse(format!(
                "unknown scorer \"{}\", expected \"lcs\" or \"ratcliff\"",
                other
            ))),
        }
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map both texts' lines to shared integer ids.
fn intern_lines(a: &str, b: &str) -> (Vec<u32>, Vec<u32>) {
    let mut ids = HashMap::new();
    let a = intern(&mut ids, a);
    let b = intern(&mut ids, b);
    (a, b)
}

fn intern<'a>(ids: &mut HashMap<&'a str, u32>, text: &'a str) -> Vec<u32> {
    text.lines()
        .map(|line| {
            let next = ids.len() as u32;
            *ids.entry(line).or_insert(next)
        })
        .collect()
}

fn degenerate(a: &[u32], b: &[u32]) -> Option<Similarity> {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Some(100),
        (true, false) | (false, true) => Some(0),
        (false, false) => None,
    }
}

/// Round `numerator / denominator` to a whole percentage.
fn to_percent(numerator: usize, denominator: usize) -> Similarity {
    let ratio = numerator as f64 / denominator as f64;
    (ratio * 100.0).round().clamp(0.0, 100.0) as Similarity
}

/// Number of inserted plus deleted lines in a shortest edit script.
fn myers_edit_distance(a: &[u32], b: &[u32]) -> usize {
    let n = a.len();
    let m = b.len();
    let max = n + m;
    if max == 0 {
        return 0;
    }
    let offset = max as isize;
    let mut v = vec![0isize; 2 * max + 1];

    for d in 0..=max {
        let d_isize = d as isize;
        let mut k = -d_isize;
        while k <= d_isize {
            let idx = (k + offset) as usize;
            let x = if k == -d_isize || (k != d_isize && v[idx - 1] < v[idx + 1]) {
                v[idx + 1]
            } else {
                v[idx - 1] + 1
            };

            let mut x2 = x;
            let mut y2 = x2 - k;
            while (x2 as usize) < n && (y2 as usize) < m && a[x2 as usize] == b[y2 as usize] {
                x2 += 1;
                y2 += 1;
            }
            v[idx] = x2;
            if (x2 as usize) >= n && (y2 as usize) >= m {
                return d;
            }

            k += 2;
        }
    }

    max
}

/// `b` needs at least this many lines before popular lines are skipped.
const POPULAR_MIN_LINES: usize = 200;

/// Longest-block search over two interned texts.
///
/// Lines making up more than 1% of a long `b` (blank lines, closing
/// braces) are left out of the index and only join a block at its edges.
/// Run lengths live in two reusable buffers indexed by `j + 1`.
struct BlockMatcher<'a> {
    a: &'a [u32],
    b: &'a [u32],
    b_index: HashMap<u32, Vec<usize>>,
    run: Vec<usize>,
    next: Vec<usize>,
    touched: Vec<usize>,
    next_touched: Vec<usize>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [u32], b: &'a [u32]) -> Self {
        let mut b_index: HashMap<u32, Vec<usize>> = HashMap::new();
        for (j, line) in b.iter().enumerate() {
            b_index.entry(*line).or_default().push(j);
        }
        if b.len() >= POPULAR_MIN_LINES {
            let limit = b.len() / 100 + 1;
            b_index.retain(|_, positions| positions.len() <= limit);
        }

        Self {
            a,
            b,
            b_index,
            run: vec![0; b.len() + 1],
            next: vec![0; b.len() + 1],
            touched: Vec::new(),
            next_touched: Vec::new(),
        }
    }

    /// Longest run `a[i..i+k] == b[j..j+k]` inside the given bounds.
    ///
    /// Ties go to the smallest `i`, then the smallest `j`.
    fn longest_match(&mut self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);

        for i in alo..ahi {
            if let Some(positions) = self.b_index.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = self.run[j] + 1;
                    self.next[j + 1] = k;
                    self.next_touched.push(j + 1);
                    if k > best_k {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_k = k;
                    }
                }
            }
            self.reset_run();
            std::mem::swap(&mut self.run, &mut self.next);
            std::mem::swap(&mut self.touched, &mut self.next_touched);
        }
        self.reset_run();

        // Popular lines next to the block
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_k += 1;
        }
        while best_i + best_k < ahi
            && best_j + best_k < bhi
            && self.a[best_i + best_k] == self.b[best_j + best_k]
        {
            best_k += 1;
        }

        (best_i, best_j, best_k)
    }

    fn reset_run(&mut self) {
        for &t in &self.touched {
            self.run[t] = 0;
        }
        self.touched.clear();
    }
}
