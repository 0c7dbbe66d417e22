use uuid::Uuid;

/// Verified identity of the user making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl Caller {
    pub fn new(user_id: Uuid, is_admin: bool) -> Self {
        Self { user_id, is_admin }
    }

    /// Whether the caller may edit content on behalf of `path_user_id`.
    ///
    /// Admins always may. Everyone else only when the id in the request path
    /// is their own. The post's stored owner is deliberately not consulted here.
    // TODO: compare against the post's stored `user_id` once clients stop
    // relying on path-supplied ids.
    pub fn may_act_for(&self, path_user_id: &str) -> bool {
        self.is_admin || Uuid::parse_str(path_user_id).is_ok_and(|id| id == self.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_and_admin_rules() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(Caller::new(me, false).may_act_for(&me.to_string()));
        assert!(!Caller::new(me, false).may_act_for(&other.to_string()));
        assert!(!Caller::new(me, false).may_act_for("not-a-uuid"));
        assert!(Caller::new(me, true).may_act_for(&other.to_string()));
    }
}
