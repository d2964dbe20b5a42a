/// Pull request states for GitHub search queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchState {
    Open,
    Closed,
}

impl SearchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchState::Open => "open",
            SearchState::Closed => "closed",
        }
    }
}

#[derive(Debug, Default)]
pub struct SearchQueryBuilder {
    terms: Vec<String>,
}

impl SearchQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pr_type(&mut self) -> &mut Self {
        self.terms.push("is:pr".to_string());
        self
    }

    pub fn state(&mut self, state: SearchState) -> &mut Self {
        self.terms.push(format!("is:{}", state.as_str()));
        self
    }

    /// Restricts results to repositories owned by `owner`.
    pub fn user(&mut self, owner: &str) -> &mut Self {
        self.terms.push(format!("user:{owner}"));
        self
    }

    pub fn build(&self) -> String {
        self.terms.join(" ")
    }
}

/// The digest's query: every open PR in the organization.
pub fn open_pull_requests_query(organization: &str) -> String {
    SearchQueryBuilder::new()
        .pr_type()
        .state(SearchState::Open)
        .user(organization)
        .build()
}
