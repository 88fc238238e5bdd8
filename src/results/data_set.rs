use super::result_set::ResultSet;

/// Container for the result sets produced by one call, in statement order.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    pub tables: Vec<ResultSet>,
}

impl DataSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, table: ResultSet) {
        self.tables.push(table);
    }

    #[must_use]
    pub fn table(&self, index: usize) -> Option<&ResultSet> {
        self.tables.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl IntoIterator for DataSet {
    type Item = ResultSet;
    type IntoIter = std::vec::IntoIter<ResultSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}
