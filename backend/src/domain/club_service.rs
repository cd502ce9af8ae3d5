//! Club and membership domain logic.
//!
//! Clubs and memberships live in two separate lists that only reference each
//! other by id. Operations that need both take both lists explicitly.
//!
//! ## Business Rules
//!
//! - Only active clubs accept members
//! - A club with `max_members > 0` is full once it has that many active members
//! - A student holds at most one active membership per club
//! - Leaving deactivates the membership; joining again reactivates it
//! - `Club::member_count` mirrors the number of active memberships and is
//!   refreshed on join and leave

use chrono::Utc;
use log::{debug, info};
use shared::{Club, ClubMembership, ClubRole};
use thiserror::Error;

use super::commands::club::JoinClubCommand;
use super::record_list::{ListError, Record, RecordList};

pub type ClubList = RecordList<Club>;
pub type MembershipList = RecordList<ClubMembership>;

impl Record for Club {
    fn id(&self) -> i32 {
        self.id
    }
}

impl Record for ClubMembership {
    fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MembershipError {
    #[error(transparent)]
    List(#[from] ListError),
    #[error("Club {0} not found")]
    ClubNotFound(i32),
    #[error("Club {0} is not active")]
    ClubInactive(i32),
    #[error("Club {club_id} is full ({max_members} members)")]
    ClubFull { club_id: i32, max_members: i32 },
    #[error("Student {student_id} is already a member of club {club_id}")]
    AlreadyMember { student_id: i32, club_id: i32 },
    #[error("Student {student_id} is not a member of club {club_id}")]
    NotMember { student_id: i32, club_id: i32 },
}

impl RecordList<Club> {
    pub fn find_by_name(&self, name: &str) -> Option<&Club> {
        self.find_first(|c| c.name == name)
    }

    /// First club in the category (case-insensitive)
    pub fn find_by_category(&self, category: &str) -> Option<&Club> {
        self.find_first(|c| c.category.eq_ignore_ascii_case(category))
    }

    pub fn sort_by_name(&mut self) {
        self.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Largest clubs first
    pub fn sort_by_member_count(&mut self) {
        self.sort_by(|a, b| b.member_count.cmp(&a.member_count));
    }

    pub fn sort_by_category(&mut self) {
        self.sort_by(|a, b| a.category.cmp(&b.category));
    }

    /// Oldest clubs first
    pub fn sort_by_founded_date(&mut self) {
        self.sort_by(|a, b| a.founded_date.cmp(&b.founded_date));
    }
}

impl RecordList<ClubMembership> {
    /// First membership of the student, active or not
    pub fn find_by_student(&self, student_id: i32) -> Option<&ClubMembership> {
        self.find_first(|m| m.student_id == student_id)
    }

    /// First membership in the club, active or not
    pub fn find_by_club(&self, club_id: i32) -> Option<&ClubMembership> {
        self.find_first(|m| m.club_id == club_id)
    }

    pub fn find_student_club(&self, student_id: i32, club_id: i32) -> Option<&ClubMembership> {
        self.find_first(|m| m.student_id == student_id && m.club_id == club_id)
    }

    fn find_student_club_mut(&mut self, student_id: i32, club_id: i32) -> Option<&mut ClubMembership> {
        self.find_first_mut(|m| m.student_id == student_id && m.club_id == club_id)
    }

    pub fn active_members_of(&self, club_id: i32) -> impl Iterator<Item = &ClubMembership> {
        self.filter(move |m| m.club_id == club_id && m.is_active)
    }

    pub fn sort_by_student(&mut self) {
        self.sort_by(|a, b| a.student_id.cmp(&b.student_id));
    }

    pub fn sort_by_club(&mut self) {
        self.sort_by(|a, b| a.club_id.cmp(&b.club_id));
    }

    pub fn sort_by_join_date(&mut self) {
        self.sort_by(|a, b| a.join_date.cmp(&b.join_date));
    }

    /// Alphabetical by role name
    pub fn sort_by_role(&mut self) {
        self.sort_by(|a, b| a.role.as_str().cmp(b.role.as_str()));
    }
}

/// True when the student has an active membership in the club
pub fn is_student_member(memberships: &MembershipList, student_id: i32, club_id: i32) -> bool {
    memberships
        .find_first(|m| m.student_id == student_id && m.club_id == club_id && m.is_active)
        .is_some()
}

/// Check every joining rule, reporting the first one that fails
pub fn check_can_join_club(
    memberships: &MembershipList,
    clubs: &ClubList,
    student_id: i32,
    club_id: i32,
) -> Result<(), MembershipError> {
    let club = clubs
        .find_by_id(club_id)
        .ok_or(MembershipError::ClubNotFound(club_id))?;

    if !club.is_active {
        return Err(MembershipError::ClubInactive(club_id));
    }

    if is_student_member(memberships, student_id, club_id) {
        return Err(MembershipError::AlreadyMember { student_id, club_id });
    }

    let active_members = memberships.active_members_of(club_id).count();
    if club.max_members > 0 && active_members >= club.max_members as usize {
        return Err(MembershipError::ClubFull {
            club_id,
            max_members: club.max_members,
        });
    }

    Ok(())
}

pub fn can_student_join_club(memberships: &MembershipList, clubs: &ClubList, student_id: i32, club_id: i32) -> bool {
    check_can_join_club(memberships, clubs, student_id, club_id).is_ok()
}

/// Recompute a club's `member_count` from its active memberships
pub fn update_club_member_count(
    clubs: &mut ClubList,
    memberships: &MembershipList,
    club_id: i32,
) -> Result<i32, MembershipError> {
    let count = memberships.active_members_of(club_id).count() as i32;
    let club = clubs
        .find_by_id_mut(club_id)
        .ok_or(MembershipError::ClubNotFound(club_id))?;
    club.member_count = count;
    debug!("Club {} now has {} active members", club_id, count);
    Ok(count)
}

/// Add a student to a club, returning the membership id.
///
/// A previous, inactive membership for the same club is reactivated with the
/// new role instead of adding a second record.
pub fn join_club(
    memberships: &mut MembershipList,
    clubs: &mut ClubList,
    command: JoinClubCommand,
) -> Result<i32, MembershipError> {
    let JoinClubCommand { student_id, club_id, role } = command;
    check_can_join_club(memberships, clubs, student_id, club_id)?;

    let now = Utc::now();
    let membership_id = match memberships.find_student_club_mut(student_id, club_id) {
        Some(previous) => {
            previous.is_active = true;
            previous.role = role;
            previous.join_date = now;
            previous.id
        }
        None => {
            let id = memberships.next_id()?;
            memberships.add(ClubMembership {
                id,
                student_id,
                club_id,
                join_date: now,
                role,
                is_active: true,
            })?;
            id
        }
    };

    update_club_member_count(clubs, memberships, club_id)?;
    info!("Student {} joined club {} as {}", student_id, club_id, role);
    Ok(membership_id)
}

/// Deactivate a student's membership in a club
pub fn leave_club(
    memberships: &mut MembershipList,
    clubs: &mut ClubList,
    student_id: i32,
    club_id: i32,
) -> Result<(), MembershipError> {
    let membership = memberships
        .find_first_mut(|m| m.student_id == student_id && m.club_id == club_id && m.is_active)
        .ok_or(MembershipError::NotMember { student_id, club_id })?;
    membership.is_active = false;

    // Clubs removed from the list can still be left
    match update_club_member_count(clubs, memberships, club_id) {
        Ok(_) | Err(MembershipError::ClubNotFound(_)) => {}
        Err(e) => return Err(e),
    }
    info!("Student {} left club {}", student_id, club_id);
    Ok(())
}

pub fn update_membership_role(
    memberships: &mut MembershipList,
    student_id: i32,
    club_id: i32,
    role: ClubRole,
) -> Result<(), MembershipError> {
    let membership = memberships
        .find_first_mut(|m| m.student_id == student_id && m.club_id == club_id && m.is_active)
        .ok_or(MembershipError::NotMember { student_id, club_id })?;
    membership.role = role;
    Ok(())
}
