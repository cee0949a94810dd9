//! Predefined (system-reserved) variables.
//!
//! The platform adds these automatically, some when a project is created and
//! others when a score element appears or at runtime. They are recognised by
//! a negative id and cannot be renamed or deleted by the user. That policy is
//! enforced by whoever owns variable state; this module only supplies the
//! data (the `id < 0` marker and the closed name set).
//!
//! Names index straight into [`PREDEFINED_VARIABLES`]; the id → name
//! table is built from the same list on first use, so the two lookups are
//! inverses by construction.
use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::variables::{id_from_key, VariableType};

// -------------------------------- Names ----------------------------------- //

/// Declared in [`PREDEFINED_VARIABLES`] order; the discriminant is the
/// record's index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredefinedVariableName {
    Score,
    Lang,
    VIdentifierVar,
    DeviceVar,
    BrowserVar,
    VrmodeVar,
    FirstnameVar,
    ScormProgress,
    ScormSuspendData,
    ScormScore,
    LastnameVar,
    FullnameVar,
    PlayerCountVar,
}

impl PredefinedVariableName {
    pub const ALL: [PredefinedVariableName; 13] = [
        Self::Score,
        Self::Lang,
        Self::VIdentifierVar,
        Self::DeviceVar,
        Self::BrowserVar,
        Self::VrmodeVar,
        Self::FirstnameVar,
        Self::ScormProgress,
        Self::ScormSuspendData,
        Self::ScormScore,
        Self::LastnameVar,
        Self::FullnameVar,
        Self::PlayerCountVar,
    ];

    /// The enum token is itself the variable's name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Lang => "lang",
            Self::VIdentifierVar => "v_identifier_var",
            Self::DeviceVar => "device_var",
            Self::BrowserVar => "browser_var",
            Self::VrmodeVar => "vrmode_var",
            Self::FirstnameVar => "firstname_var",
            Self::ScormProgress => "scorm_progress",
            Self::ScormSuspendData => "scorm_suspend_data",
            Self::ScormScore => "scorm_score",
            Self::LastnameVar => "lastname_var",
            Self::FullnameVar => "fullname_var",
            Self::PlayerCountVar => "player_count_var",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.as_str() == token)
    }

    pub fn defaults(self) -> &'static PredefinedVarDefaults {
        predefined_variable_defaults(self)
    }
}

impl fmt::Display for PredefinedVariableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ------------------------------- Records ---------------------------------- //

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredefinedVarDefaults {
    pub id: i64,
    #[serde(rename = "type")]
    pub type_: VariableType,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredefinedVariable {
    pub name: PredefinedVariableName,
    #[serde(flatten)]
    pub defaults: PredefinedVarDefaults,
}

const fn var(
    name: PredefinedVariableName,
    id: i64,
    type_: VariableType,
    description: &'static str,
) -> PredefinedVariable {
    PredefinedVariable { name, defaults: PredefinedVarDefaults { id, type_, description } }
}

/// The authoritative list. Ids are fixed forever: persisted projects key
/// values by them.
pub static PREDEFINED_VARIABLES: [PredefinedVariable; PredefinedVariableName::ALL.len()] = {
    use PredefinedVariableName as N;
    use VariableType as T;
    [
        var(N::Score, -2, T::Number,
            "This is a special numeric field that gets used in Leaderboard. Can be used to store overall score."),
        var(N::Lang, -3, T::String,
            "In case Language Tools are used, the language defined in that section gets stored here."),
        var(N::VIdentifierVar, -8, T::String,
            "Stores the unique identifier of the viewer viewing this experience. Can be email/name etc. - depends on the authenticaion mechanism used in the Deployment section."),
        var(N::DeviceVar, -9, T::String,
            "Viewer device type. 'm' for mobile, 'd' for desktop and 'h' for headset."),
        var(N::BrowserVar, -10, T::String,
            "Contains a string identifying the browser the viewer is using."),
        var(N::VrmodeVar, -11, T::Boolean,
            "If the user is in VR mode, this is set to true. Can be used to display things differently in VR mode."),
        var(N::FirstnameVar, -12, T::String,
            "Stores the viewer's first name if available from the authentication mechanism"),
        var(N::ScormProgress, -13, T::Number,
            "This is a special variable that can share the progress with a LMS and will be retrieved upon experience revisit"),
        var(N::ScormSuspendData, -14, T::Number,
            "This a special variable that can share arbitrary data with a LMS and will be retrieved upon experience revisit"),
        var(N::ScormScore, -15, T::Number,
            "This a special variable that can share score with a LMS and will be retrieved upon experience revisit"),
        var(N::LastnameVar, -16, T::String,
            "Stores the viewer's last name if available from the authentication mechanism"),
        var(N::FullnameVar, -17, T::String,
            "Stores the viewer's full name if available from the authentication mechanism"),
        var(N::PlayerCountVar, -18, T::Number,
            "Stores the total number of live viewers in the experience"),
    ]
};

// ------------------------------- Tables ----------------------------------- //

static ID_TO_NAME: Lazy<HashMap<i64, PredefinedVariableName>> = Lazy::new(|| {
    PREDEFINED_VARIABLES
        .iter()
        .map(|v| (v.defaults.id, v.name))
        .collect()
});

/// Total over the name enum: every predefined name has a record.
pub fn predefined_variable(name: PredefinedVariableName) -> &'static PredefinedVariable {
    &PREDEFINED_VARIABLES[name as usize]
}

pub fn predefined_variable_defaults(name: PredefinedVariableName) -> &'static PredefinedVarDefaults {
    &predefined_variable(name).defaults
}

/// `None` means the id belongs to a user-defined or global variable.
pub fn predefined_variable_name_for_id(id: i64) -> Option<PredefinedVariableName> {
    ID_TO_NAME.get(&id).copied()
}

/// Defaults for a raw name token; `None` if it is not a predefined name.
pub fn predefined_defaults_for_name(token: &str) -> Option<&'static PredefinedVarDefaults> {
    PredefinedVariableName::parse(token).map(predefined_variable_defaults)
}

/// Resolve a `VarsMap` key, which is either an id rendered as a string
/// (`"-2"`) or a name (`"score"`). Non-canonical numerals like `"-02"`
/// resolve to nothing.
pub fn predefined_name_for_key(key: &str) -> Option<PredefinedVariableName> {
    match id_from_key(key) {
        Some(id) => predefined_variable_name_for_id(id),
        None => PredefinedVariableName::parse(key),
    }
}

/// How to identify a predefined variable: `id < 0`.
pub fn is_predefined_id(id: i64) -> bool {
    id < 0
}

// ------------------------------- Tests ------------------------------------ //
