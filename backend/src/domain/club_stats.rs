//! Club statistics and per-student club summaries.

use shared::{ClubStatistics, StudentClub, StudentClubInfo};

use super::club_service::{ClubList, MembershipList};

/// Aggregate figures over all clubs and memberships.
///
/// Popularity is measured in active memberships. Ties go to the club that
/// comes first in list order, as does the most common category.
pub fn calculate_club_statistics(clubs: &ClubList, memberships: &MembershipList) -> ClubStatistics {
    let total_clubs = clubs.len();
    let active_clubs = clubs.iter().filter(|c| c.is_active).count();
    let total_memberships = memberships.len();
    let active_memberships = memberships.iter().filter(|m| m.is_active).count();

    let average_members_per_club = if total_clubs == 0 {
        0.0
    } else {
        active_memberships as f64 / total_clubs as f64
    };

    let mut most_popular: Option<(i32, usize)> = None;
    let mut least_popular: Option<(i32, usize)> = None;
    for club in clubs {
        let members = memberships.active_members_of(club.id).count();
        if most_popular.map_or(true, |(_, best)| members > best) {
            most_popular = Some((club.id, members));
        }
        if least_popular.map_or(true, |(_, worst)| members < worst) {
            least_popular = Some((club.id, members));
        }
    }

    // (category, count) in order of first appearance
    let mut categories: Vec<(&str, usize)> = Vec::new();
    for club in clubs {
        match categories.iter_mut().find(|(name, _)| *name == club.category) {
            Some((_, count)) => *count += 1,
            None => categories.push((club.category.as_str(), 1)),
        }
    }
    let most_common_category = categories
        .iter()
        .fold(None::<(&str, usize)>, |best, &(name, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((name, count)),
        })
        .map(|(name, _)| name.to_string());

    ClubStatistics {
        total_clubs,
        active_clubs,
        total_memberships,
        active_memberships,
        average_members_per_club,
        most_popular_club_id: most_popular.map(|(id, _)| id),
        least_popular_club_id: least_popular.map(|(id, _)| id),
        most_common_category,
    }
}

/// The clubs a student actively belongs to, in membership list order
pub fn student_club_info(memberships: &MembershipList, clubs: &ClubList, student_id: i32) -> StudentClubInfo {
    let entries = memberships
        .filter(move |m| m.student_id == student_id && m.is_active)
        .map(|m| StudentClub {
            club_id: m.club_id,
            club_name: clubs
                .find_by_id(m.club_id)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            role: m.role,
        })
        .collect();

    StudentClubInfo {
        student_id,
        clubs: entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::club_service::tests::club;
    use crate::domain::club_service::join_club;
    use crate::domain::commands::club::JoinClubCommand;
    use shared::ClubRole;

    fn populated() -> (ClubList, MembershipList) {
        let mut clubs = ClubList::new();
        clubs.add(club(1, "Chess", "Academic", 0)).unwrap();
        clubs.add(club(2, "Football", "Sports", 0)).unwrap();
        clubs.add(club(3, "Debate", "Academic", 0)).unwrap();
        let mut memberships = MembershipList::new();

        for (student_id, club_id, role) in [
            (10, 2, ClubRole::Member),
            (11, 2, ClubRole::Secretary),
            (10, 1, ClubRole::President),
            (12, 2, ClubRole::Member),
        ] {
            join_club(&mut memberships, &mut clubs, JoinClubCommand { student_id, club_id, role }).unwrap();
        }
        (clubs, memberships)
    }

    #[test]
    fn test_club_statistics() {
        let (clubs, memberships) = populated();
        let stats = calculate_club_statistics(&clubs, &memberships);

        assert_eq!(stats.total_clubs, 3);
        assert_eq!(stats.active_clubs, 3);
        assert_eq!(stats.total_memberships, 4);
        assert_eq!(stats.active_memberships, 4);
        assert!((stats.average_members_per_club - 4.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.most_popular_club_id, Some(2));
        assert_eq!(stats.least_popular_club_id, Some(3));
        assert_eq!(stats.most_common_category.as_deref(), Some("Academic"));
    }

    #[test]
    fn test_empty_statistics() {
        let stats = calculate_club_statistics(&ClubList::new(), &MembershipList::new());
        assert_eq!(stats.total_clubs, 0);
        assert_eq!(stats.average_members_per_club, 0.0);
        assert_eq!(stats.most_popular_club_id, None);
        assert_eq!(stats.most_common_category, None);
    }

    #[test]
    fn test_student_club_info() {
        let (clubs, memberships) = populated();
        let info = student_club_info(&memberships, &clubs, 10);

        assert_eq!(info.club_count(), 2);
        assert_eq!(info.clubs[0].club_name, "Football");
        assert_eq!(info.clubs[1].club_name, "Chess");
        assert_eq!(info.clubs[1].role, ClubRole::President);
        assert_eq!(student_club_info(&memberships, &clubs, 99).club_count(), 0);
    }
}
