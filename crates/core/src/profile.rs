//! Incomplete-profile notification.
//!
//! An incomplete profile is not an error. The shell shows a dismissable banner that links to
//! the external profile setup page.

use crate::collaborators::UserProfile;
use crate::constants::PROFILE_SETUP_PATH;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileNotice {
    pub message: String,
    pub remediation_label: String,
    pub remediation_path: String,
}

impl ProfileNotice {
    /// The banner to show, if any.
    ///
    /// Only authenticated users with a loaded profile missing first name, last name, title or
    /// NPI number get a notice.
    pub fn evaluate(authenticated: bool, user: Option<&UserProfile>) -> Option<Self> {
        let user = user?;
        if !authenticated || !user.is_incomplete() {
            return None;
        }
        Some(Self {
            message: "Your profile is incomplete.".into(),
            remediation_label: "Complete your profile".into(),
            remediation_path: PROFILE_SETUP_PATH.into(),
        })
    }
}

/// Banner visibility for one session; dismissal lasts until the session ends.
#[derive(Clone, Debug, Default)]
pub struct ProfileBanner {
    notice: Option<ProfileNotice>,
    dismissed: bool,
}

impl ProfileBanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh(&mut self, authenticated: bool, user: Option<&UserProfile>) {
        self.notice = ProfileNotice::evaluate(authenticated, user);
    }

    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }

    pub fn visible(&self) -> Option<&ProfileNotice> {
        if self.dismissed {
            return None;
        }
        self.notice.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incomplete_user() -> UserProfile {
        UserProfile {
            id: "1".into(),
            first_name: "John".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_evaluate() {
        assert!(ProfileNotice::evaluate(true, None).is_none());
        assert!(ProfileNotice::evaluate(false, Some(&incomplete_user())).is_none());

        let notice = ProfileNotice::evaluate(true, Some(&incomplete_user())).unwrap();
        assert_eq!(notice.remediation_path, "/profile/setup");
    }

    #[test]
    fn test_banner_dismissal() {
        let mut banner = ProfileBanner::new();
        banner.refresh(true, Some(&incomplete_user()));
        assert!(banner.visible().is_some());

        banner.dismiss();
        assert!(banner.visible().is_none());
        banner.refresh(true, Some(&incomplete_user()));
        assert!(banner.visible().is_none());
    }
}
