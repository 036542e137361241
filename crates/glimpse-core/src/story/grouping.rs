use super::model::{AuthorProfile, Story, StoryGroup, UserId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Groups the stories still active at `now` by author.
///
/// Groups come out in first-seen author order. Inside a group stories are
/// ordered oldest to newest; stories sharing a timestamp keep their input
/// order. Authors with no active stories produce no group. Authors missing
/// from `profiles` get [`AuthorProfile::placeholder`].
pub fn group_by_author(
    stories: &[Story],
    profiles: &HashMap<UserId, AuthorProfile>,
    now: DateTime<Utc>,
) -> Vec<StoryGroup> {
    let mut groups: Vec<StoryGroup> = Vec::new();
    let mut slot_by_author: HashMap<&str, usize> = HashMap::new();

    for story in stories.iter().filter(|s| s.is_active_at(now)) {
        let slot = *slot_by_author
            .entry(story.author_id.as_str())
            .or_insert_with(|| {
                let author = profiles
                    .get(&story.author_id)
                    .cloned()
                    .unwrap_or_else(|| AuthorProfile::placeholder(story.author_id.clone()));
                groups.push(StoryGroup {
                    author,
                    stories: Vec::new(),
                });
                groups.len() - 1
            });
        groups[slot].stories.push(story.clone());
    }

    for group in &mut groups {
        group.stories.sort_by_key(|s| s.created_at);
    }

    groups
}

/// Orders groups most-recent story first, breaking ties by author id.
pub fn order_groups(groups: &mut [StoryGroup]) {
    groups.sort_by(|a, b| {
        b.latest_created_at()
            .cmp(&a.latest_created_at())
            .then_with(|| a.author.id.cmp(&b.author.id))
    });
}
