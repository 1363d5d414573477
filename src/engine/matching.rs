use crate::types::Activity;

/// Find the first activity whose name or location contains `needle`,
/// case-folded. Returns `None` for an empty needle or when nothing matches;
/// callers decide whether a miss is a no-op or degrades to an add.
pub fn find_activity(activities: &[Activity], needle: &str) -> Option<usize> {
    let target = needle.trim().to_lowercase();
    if target.is_empty() {
        return None;
    }
    activities.iter().position(|act| {
        act.name.to_lowercase().contains(&target) || act.location.to_lowercase().contains(&target)
    })
}

/// Find the segment index of an adjacent activity pair matching `from` and
/// `to`, in order. The returned index addresses the transport segment
/// between positions `i` and `i + 1`.
pub fn find_adjacent_pair(activities: &[Activity], from: &str, to: &str) -> Option<usize> {
    if activities.len() < 2 {
        return None;
    }
    let from_target = from.trim().to_lowercase();
    let to_target = to.trim().to_lowercase();
    if from_target.is_empty() || to_target.is_empty() {
        return None;
    }
    (0..activities.len() - 1).find(|&i| {
        matches_one(&activities[i], &from_target) && matches_one(&activities[i + 1], &to_target)
    })
}

fn matches_one(activity: &Activity, target: &str) -> bool {
    activity.name.to_lowercase().contains(target)
        || activity.location.to_lowercase().contains(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: &str, name: &str, location: &str) -> Activity {
        Activity {
            id: id.to_string(),
            name: name.to_string(),
            location: location.to_string(),
            lat: None,
            lng: None,
            time: "09:00".to_string(),
            duration: "1시간".to_string(),
            description: String::new(),
            image: "/default-activity.jpg".to_string(),
            open_hours: "알 수 없음".to_string(),
            price: "알 수 없음".to_string(),
            tips: vec![],
            nearby_food: vec![],
            estimated_duration: "1시간".to_string(),
            best_time: "오전".to_string(),
        }
    }

    #[test]
    fn test_find_by_name_substring() {
        let acts = vec![
            activity("1-1", "루브르 박물관", "파리"),
            activity("1-2", "에펠탑", "파리"),
        ];
        assert_eq!(find_activity(&acts, "에펠"), Some(1));
        assert_eq!(find_activity(&acts, "EIFFEL"), None);
    }

    #[test]
    fn test_find_by_location_substring() {
        let acts = vec![activity("1-1", "Morning Walk", "Montmartre, Paris")];
        assert_eq!(find_activity(&acts, "montmartre"), Some(0));
    }

    #[test]
    fn test_empty_needle_never_matches() {
        let acts = vec![activity("1-1", "에펠탑", "파리")];
        assert_eq!(find_activity(&acts, ""), None);
        assert_eq!(find_activity(&acts, "   "), None);
    }

    #[test]
    fn test_adjacent_pair_in_order_only() {
        let acts = vec![
            activity("1-1", "Louvre", "Paris"),
            activity("1-2", "Eiffel Tower", "Paris"),
            activity("1-3", "Seine Cruise", "Paris"),
        ];
        assert_eq!(find_adjacent_pair(&acts, "louvre", "eiffel"), Some(0));
        assert_eq!(find_adjacent_pair(&acts, "eiffel", "seine"), Some(1));
        assert_eq!(find_adjacent_pair(&acts, "seine", "eiffel"), None);
        assert_eq!(find_adjacent_pair(&acts, "louvre", "seine"), None);
    }
}
