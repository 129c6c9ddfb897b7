use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What the caller is allowed to do, resolved by the identity collaborator
/// before the call reaches the attendance core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    SelfService,
    Supervisor,
    HrAdmin,
    System,
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "self_service" => Ok(Self::SelfService),
            "supervisor" => Ok(Self::Supervisor),
            "hr_admin" => Ok(Self::HrAdmin),
            "system" => Ok(Self::System),
            other => Err(format!("unknown capability: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
    pub capability: Capability,
}

impl Actor {
    pub fn employee(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            capability: Capability::SelfService,
        }
    }

    pub fn hr_admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            capability: Capability::HrAdmin,
        }
    }

    pub fn supervisor(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            capability: Capability::Supervisor,
        }
    }

    pub fn system() -> Self {
        Self {
            user_id: "system".to_string(),
            capability: Capability::System,
        }
    }

    /// Self-service on the actor's own record, or HR acting on their behalf.
    pub fn can_act_for(&self, employee_id: &str) -> bool {
        match self.capability {
            Capability::SelfService => self.user_id == employee_id,
            Capability::HrAdmin => true,
            Capability::Supervisor | Capability::System => false,
        }
    }

    /// Read access to an employee's records and summaries.
    pub fn can_view(&self, employee_id: &str) -> bool {
        match self.capability {
            Capability::SelfService => self.user_id == employee_id,
            Capability::Supervisor | Capability::HrAdmin | Capability::System => true,
        }
    }

    pub fn can_flag(&self) -> bool {
        matches!(self.capability, Capability::Supervisor | Capability::HrAdmin)
    }

    pub fn can_decide_corrections(&self) -> bool {
        matches!(self.capability, Capability::Supervisor | Capability::HrAdmin)
    }

    pub fn can_override(&self) -> bool {
        self.capability == Capability::HrAdmin
    }

    pub fn can_trigger_reconciliation(&self) -> bool {
        matches!(self.capability, Capability::HrAdmin | Capability::System)
    }
}

#[cfg(test)]
mod capability_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_only_let_employees_act_for_themselves() {
        let actor = Actor::employee("emp-0001");
        assert!(actor.can_act_for("emp-0001"));
        assert!(!actor.can_act_for("emp-0002"));
        assert!(!actor.can_override());
        assert!(actor.can_view("emp-0001"));
        assert!(!actor.can_view("emp-0002"));
        assert!(Actor::supervisor("sup-1").can_view("emp-0002"));
    }

    #[rstest]
    #[case(Actor::supervisor("sup-1"), true, false, false)]
    #[case(Actor::hr_admin("hr-1"), true, true, true)]
    #[case(Actor::system(), false, false, true)]
    fn it_should_map_capabilities_to_permissions(
        #[case] actor: Actor,
        #[case] decide: bool,
        #[case] override_record: bool,
        #[case] reconcile: bool,
    ) {
        assert_eq!(actor.can_decide_corrections(), decide);
        assert_eq!(actor.can_flag(), decide);
        assert_eq!(actor.can_override(), override_record);
        assert_eq!(actor.can_trigger_reconciliation(), reconcile);
    }

    #[rstest]
    #[case("self_service", Capability::SelfService)]
    #[case("hr_admin", Capability::HrAdmin)]
    fn it_should_parse_capabilities(#[case] raw: &str, #[case] expected: Capability) {
        assert_eq!(raw.parse::<Capability>(), Ok(expected));
        assert!("root".parse::<Capability>().is_err());
    }
}
