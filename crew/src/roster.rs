use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    pub name: String,
    pub role: String,
}

impl CrewMember {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
        }
    }
}

/// The six-person mission crew.
pub fn default_roster() -> Vec<CrewMember> {
    [
        ("Commander Chen", "Mission Commander"),
        ("Dr. Rodriguez", "Chief Medical Officer"),
        ("Engineer Patel", "Systems Engineer"),
        ("Lt. Kim", "Flight Engineer"),
        ("Specialist Brown", "Science Specialist"),
        ("Dr. Wilson", "Research Scientist"),
    ]
    .into_iter()
    .map(|(name, role)| CrewMember::new(name, role))
    .collect()
}
