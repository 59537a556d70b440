/// the stage of a scenario at which a failure occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStep {
    MakeLayer,
    AddOrigins,
    AddDestinations,
    Solve,
    FilterLines,
    WriteLines,
    WriteFrequencyTable,
    WriteOrigins,
    SpatialJoin,
    WriteAccessibility,
    WriteSummary,
}

impl PipelineStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStep::MakeLayer => "make OD cost matrix layer",
            PipelineStep::AddOrigins => "add origins",
            PipelineStep::AddDestinations => "add destinations",
            PipelineStep::Solve => "solve",
            PipelineStep::FilterLines => "filter lines",
            PipelineStep::WriteLines => "write lines",
            PipelineStep::WriteFrequencyTable => "write frequency table",
            PipelineStep::WriteOrigins => "write origins",
            PipelineStep::SpatialJoin => "spatial join",
            PipelineStep::WriteAccessibility => "write accessibility",
            PipelineStep::WriteSummary => "write summary",
        }
    }
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
