/// Scored candidates for one node
/// (node index, score)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    pub list: Vec<(usize, f64)>,
}

impl Ranking {
    pub fn new(list: Vec<(usize, f64)>) -> Self {
        Ranking { list }
    }

    /// Sort by descending score, ties by ascending index
    /// NaN scores sort last
    pub fn sort_by_score_desc(&mut self) -> &mut Self {
        self.list.sort_by(|a, b| {
            let sa = if a.1.is_nan() { f64::NEG_INFINITY } else { a.1 };
            let sb = if b.1.is_nan() { f64::NEG_INFINITY } else { b.1 };
            sb.total_cmp(&sa).then_with(|| a.0.cmp(&b.0))
        });
        self
    }

    /// Keep the first `k` entries
    pub fn truncate(&mut self, k: usize) -> &mut Self {
        self.list.truncate(k);
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
