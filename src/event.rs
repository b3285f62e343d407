//! Build lifecycle events and their classification
//!
//! The host delivers events of several unrelated shapes through a single
//! callback. [`RawEvent`] is the closed set of shapes this profiler knows,
//! and [`classify`] normalizes each into an [`Event`]: the identifier the
//! duration is aggregated under (if any) and whether it opens or closes a
//! measurement.
//!
//! Two event families exist:
//! - request/result pairs, one fixed identifier per [`Phase`]
//! - typed events carrying a discriminant ([`RepositoryEvent`],
//!   [`ExecutionEvent`]), the latter deriving its identifier from the mojo
//!   execution descriptor

use serde::Deserialize;

/// Identifier for settings building
pub const SETTINGS_BUILDING: &str = "maven:settings-building";
/// Identifier for toolchains building
pub const TOOLCHAINS_BUILDING: &str = "maven:toolchains-building";
/// Identifier for project dependency resolution
pub const DEPENDENCY_RESOLUTION: &str = "maven:dependency-resolution";
/// Identifier for artifact downloads
pub const ARTIFACT_DOWNLOAD: &str = "maven:repository:artifact-download";
/// Identifier for artifact deployments
pub const ARTIFACT_DEPLOYMENT: &str = "maven:repository:artifact-deployment";

/// Host type name of execution events, used when one cannot be paired
const EXECUTION_EVENT_TYPE: &str = "org.apache.maven.execution.ExecutionEvent";
const REPOSITORY_EVENT_TYPE: &str = "org.eclipse.aether.RepositoryEvent";

/// Lifecycle phases announced by a request/result pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    SettingsBuilding,
    ToolchainsBuilding,
    DependencyResolution,
    /// The overall build: observed, never measured
    Execution,
}

impl Phase {
    /// Identifier this phase is measured under, `None` if unmeasured
    pub fn identifier(self) -> Option<&'static str> {
        match self {
            Phase::SettingsBuilding => Some(SETTINGS_BUILDING),
            Phase::ToolchainsBuilding => Some(TOOLCHAINS_BUILDING),
            Phase::DependencyResolution => Some(DEPENDENCY_RESOLUTION),
            Phase::Execution => None,
        }
    }

    fn request_type_name(self) -> &'static str {
        match self {
            Phase::SettingsBuilding => "org.apache.maven.settings.building.SettingsBuildingRequest",
            Phase::ToolchainsBuilding => {
                "org.apache.maven.toolchain.building.ToolchainsBuildingRequest"
            }
            Phase::DependencyResolution => "org.apache.maven.project.DependencyResolutionRequest",
            Phase::Execution => "org.apache.maven.execution.MavenExecutionRequest",
        }
    }

    fn result_type_name(self) -> &'static str {
        match self {
            Phase::SettingsBuilding => "org.apache.maven.settings.building.SettingsBuildingResult",
            Phase::ToolchainsBuilding => {
                "org.apache.maven.toolchain.building.ToolchainsBuildingResult"
            }
            Phase::DependencyResolution => "org.apache.maven.project.DependencyResolutionResult",
            Phase::Execution => "org.apache.maven.execution.MavenExecutionResult",
        }
    }
}

/// Discriminant of a repository event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepositoryEventType {
    ArtifactDescriptorInvalid,
    ArtifactDescriptorMissing,
    MetadataInvalid,
    ArtifactResolving,
    ArtifactResolved,
    MetadataResolving,
    MetadataResolved,
    ArtifactDownloading,
    ArtifactDownloaded,
    MetadataDownloading,
    MetadataDownloaded,
    ArtifactInstalling,
    ArtifactInstalled,
    MetadataInstalling,
    MetadataInstalled,
    ArtifactDeploying,
    ArtifactDeployed,
    MetadataDeploying,
    MetadataDeployed,
    /// Any type this list does not name
    #[serde(other)]
    Unknown,
}

/// Event raised by the artifact repository system
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryEvent {
    pub kind: RepositoryEventType,
}

/// Discriminant of a build execution event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ExecutionEventType {
    ProjectDiscoveryStarted,
    SessionStarted,
    SessionEnded,
    ProjectSkipped,
    ProjectStarted,
    ProjectSucceeded,
    ProjectFailed,
    MojoSkipped,
    MojoStarted,
    MojoSucceeded,
    MojoFailed,
    ForkStarted,
    ForkSucceeded,
    ForkFailed,
    ForkedProjectStarted,
    ForkedProjectSucceeded,
    ForkedProjectFailed,
    /// Any type this list does not name
    #[serde(other)]
    Unknown,
}

/// Descriptor of a single plugin goal execution
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MojoExecution {
    pub group_id: String,
    pub artifact_id: String,
    pub goal: String,
    pub execution_id: String,
}

impl MojoExecution {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        goal: impl Into<String>,
        execution_id: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            goal: goal.into(),
            execution_id: execution_id.into(),
        }
    }

    /// `groupId:artifactId:goal@executionId`
    pub fn identifier(&self) -> String {
        format!(
            "{}:{}:{}@{}",
            self.group_id, self.artifact_id, self.goal, self.execution_id
        )
    }
}

/// Event raised by the build executor
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionEvent {
    pub kind: ExecutionEventType,
    /// Present on mojo events only
    #[serde(default)]
    pub mojo_execution: Option<MojoExecution>,
}

impl ExecutionEvent {
    pub fn mojo(kind: ExecutionEventType, execution: MojoExecution) -> Self {
        Self {
            kind,
            mojo_execution: Some(execution),
        }
    }
}

/// An event as delivered by the host
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawEvent {
    Request { phase: Phase },
    Result { phase: Phase },
    Repository(RepositoryEvent),
    Execution(ExecutionEvent),
    /// Any event without a known shape, tagged by its host type name
    Other { type_name: String },
}

impl RawEvent {
    pub fn other(type_name: impl Into<String>) -> Self {
        RawEvent::Other {
            type_name: type_name.into(),
        }
    }

    /// Stable host type name of this event
    pub fn type_name(&self) -> &str {
        match self {
            RawEvent::Request { phase } => phase.request_type_name(),
            RawEvent::Result { phase } => phase.result_type_name(),
            RawEvent::Repository(_) => REPOSITORY_EVENT_TYPE,
            RawEvent::Execution(_) => EXECUTION_EVENT_TYPE,
            RawEvent::Other { type_name } => type_name,
        }
    }
}

/// Normalized event: what to measure and in which direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// `None` for events that are observed but not measured
    pub identifier: Option<String>,
    pub is_start: bool,
}

impl Event {
    pub fn start(identifier: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            is_start: true,
        }
    }

    pub fn end(identifier: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            is_start: false,
        }
    }

    fn unmeasured(is_start: bool) -> Self {
        Self {
            identifier: None,
            is_start,
        }
    }
}

/// Outcome of [`classify`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Observed(Event),
    /// Shape not recognized; carries the type name to report
    Unsupported(String),
}

/// Map a host event onto a normalized [`Event`]
///
/// Pure: no state is touched. Discriminants that carry no measurement map to
/// an unmeasured start so they never open a timer.
pub fn classify(raw: &RawEvent) -> Classification {
    match raw {
        RawEvent::Request { phase } => Classification::Observed(phase_event(*phase, true)),
        RawEvent::Result { phase } => Classification::Observed(phase_event(*phase, false)),
        RawEvent::Repository(event) => Classification::Observed(classify_repository(event)),
        RawEvent::Execution(event) => classify_execution(event),
        RawEvent::Other { type_name } => Classification::Unsupported(type_name.clone()),
    }
}

fn phase_event(phase: Phase, is_start: bool) -> Event {
    match phase.identifier() {
        Some(identifier) => Event {
            identifier: Some(identifier.to_string()),
            is_start,
        },
        None => Event::unmeasured(is_start),
    }
}

fn classify_repository(event: &RepositoryEvent) -> Event {
    match event.kind {
        RepositoryEventType::ArtifactDownloading => Event::start(ARTIFACT_DOWNLOAD),
        RepositoryEventType::ArtifactDownloaded => Event::end(ARTIFACT_DOWNLOAD),
        RepositoryEventType::ArtifactDeploying => Event::start(ARTIFACT_DEPLOYMENT),
        RepositoryEventType::ArtifactDeployed => Event::end(ARTIFACT_DEPLOYMENT),
        _ => Event::unmeasured(true),
    }
}

fn classify_execution(event: &ExecutionEvent) -> Classification {
    let is_start = match event.kind {
        ExecutionEventType::MojoStarted => true,
        ExecutionEventType::MojoSucceeded | ExecutionEventType::MojoFailed => false,
        _ => return Classification::Observed(Event::unmeasured(true)),
    };

    match &event.mojo_execution {
        Some(execution) => Classification::Observed(Event {
            identifier: Some(execution.identifier()),
            is_start,
        }),
        // Without a descriptor the start and end cannot be paired
        None => Classification::Unsupported(EXECUTION_EVENT_TYPE.to_string()),
    }
}
