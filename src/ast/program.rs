use crate::ast::Statement;

/// A completely parsed program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// Statements in source order
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Program { statements }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    /// Number of `q(...)` directives.
    pub fn query_count(&self) -> usize {
        self.iter()
            .filter(|stmt| matches!(stmt, Statement::Query(_)))
            .count()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
