/// Parameters forwarded verbatim to the analysis service. The pipeline
/// validates their presence, never their semantic range.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub domain: String,
    pub paragraph_number: String,
}
