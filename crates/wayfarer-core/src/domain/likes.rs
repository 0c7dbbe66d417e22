use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Users who liked a post.
///
/// Insertion-ordered and duplicate-free. Serialized as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LikeSet(Vec<Uuid>);

impl LikeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, user_id: &Uuid) -> bool {
        self.0.contains(user_id)
    }

    /// Flip membership of `user_id`. Returns `true` when the user now likes the post.
    pub fn toggle(&mut self, user_id: Uuid) -> bool {
        match self.0.iter().position(|id| *id == user_id) {
            Some(index) => {
                self.0.remove(index);
                false
            }
            None => {
                self.0.push(user_id);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<Uuid> {
        self.0
    }
}

impl FromIterator<Uuid> for LikeSet {
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        let mut set = Vec::new();
        for id in iter {
            if !set.contains(&id) {
                set.push(id);
            }
        }
        Self(set)
    }
}

impl From<Vec<Uuid>> for LikeSet {
    fn from(ids: Vec<Uuid>) -> Self {
        ids.into_iter().collect()
    }
}

impl<'de> Deserialize<'de> for LikeSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Uuid>::deserialize(deserializer).map(Into::into)
    }
}
