use crate::types::{PermissionResponse, PermissionStatus};

/// Collapse a raw platform permission result into a three-way status.
///
/// A grant wins over everything else. Without a grant, a platform that will
/// still show the prompt leaves the status undetermined; otherwise the user
/// has denied notifications.
pub fn resolve_permission_status(response: &PermissionResponse) -> PermissionStatus {
    if response.granted {
        return PermissionStatus::Granted;
    }

    if response.can_ask_again {
        PermissionStatus::Undetermined
    } else {
        PermissionStatus::Denied
    }
}

impl From<&PermissionResponse> for PermissionStatus {
    fn from(response: &PermissionResponse) -> Self {
        resolve_permission_status(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granted_wins_regardless_of_can_ask_again() {
        for can_ask_again in [true, false] {
            let response = PermissionResponse::new(true, can_ask_again);
            assert_eq!(resolve_permission_status(&response), PermissionStatus::Granted);
        }
    }

    #[test]
    fn askable_is_undetermined() {
        assert_eq!(
            resolve_permission_status(&PermissionResponse::askable()),
            PermissionStatus::Undetermined
        );
    }

    #[test]
    fn blocked_is_denied() {
        assert_eq!(
            PermissionStatus::from(&PermissionResponse::blocked()),
            PermissionStatus::Denied
        );
    }
}
