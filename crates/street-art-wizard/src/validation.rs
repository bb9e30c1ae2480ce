/*
[INPUT]:  Current step and draft snapshot
[OUTPUT]: Step enum with skip-aware navigation, per-field error map
[POS]:    Validation layer - presence rules gating each step
[UPDATE]: When fields move between steps or required sets change
*/

use std::collections::BTreeMap;
use std::fmt;

use crate::draft::{Field, SubmissionDraft};

/// Missing-field messages keyed by field
pub type FieldErrors = BTreeMap<Field, String>;

/// The four wizard pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Identity = 1,
    ArtistProfile = 2,
    Artwork = 3,
    Listing = 4,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Identity, Step::ArtistProfile, Step::Artwork, Step::Listing];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Identity => "Artist",
            Step::ArtistProfile => "Profile",
            Step::Artwork => "Artwork",
            Step::Listing => "Listing",
        }
    }

    /// Fields that must be present before leaving this step
    pub fn required_fields(self) -> &'static [Field] {
        match self {
            Step::Identity => &[Field::ArtistName, Field::ArtistEmail],
            Step::ArtistProfile => &[
                Field::ArtistImage,
                Field::ArtistPortfolioLink,
                Field::ArtistSocialLink,
            ],
            Step::Artwork => &[Field::ArtworkImage, Field::ArtworkTitle, Field::ArtworkDetails],
            Step::Listing => &[Field::ArtworkCategory, Field::ArtworkPrice, Field::ArtworkSize],
        }
    }

    /// Fields shown on this step, in display order
    pub fn fields(self) -> &'static [Field] {
        match self {
            Step::Identity => &[Field::ArtistName, Field::ArtistEmail, Field::ArtistAbout],
            Step::ArtistProfile => &[
                Field::ArtistImage,
                Field::ArtistPortfolioLink,
                Field::ArtistSocialLink,
            ],
            Step::Artwork => &[Field::ArtworkImage, Field::ArtworkTitle, Field::ArtworkDetails],
            Step::Listing => &[Field::ArtworkCategory, Field::ArtworkPrice, Field::ArtworkSize],
        }
    }

    /// Following step; the profile page is skipped for returning artists
    pub fn next(self, skip_profile: bool) -> Option<Step> {
        match self {
            Step::Identity if skip_profile => Some(Step::Artwork),
            Step::Identity => Some(Step::ArtistProfile),
            Step::ArtistProfile => Some(Step::Artwork),
            Step::Artwork => Some(Step::Listing),
            Step::Listing => None,
        }
    }

    pub fn previous(self, skip_profile: bool) -> Option<Step> {
        match self {
            Step::Identity => None,
            Step::ArtistProfile => Some(Step::Identity),
            Step::Artwork if skip_profile => Some(Step::Identity),
            Step::Artwork => Some(Step::ArtistProfile),
            Step::Listing => Some(Step::Artwork),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}

/// Presence check for every required field of `step`.
///
/// The returned map holds exactly the missing fields; an empty map means the
/// step may be left.
pub fn validate(step: Step, draft: &SubmissionDraft) -> FieldErrors {
    step.required_fields()
        .iter()
        .filter(|field| !draft.is_present(**field))
        .map(|field| (*field, format!("{} is required", field.label())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::FileAttachment;

    fn attachment(name: &str) -> FileAttachment {
        FileAttachment::from_metadata(format!("/tmp/{name}"), 1).expect("attachment")
    }

    #[test]
    fn test_empty_draft_reports_every_required_field() {
        let draft = SubmissionDraft::default();
        for step in Step::ALL {
            let errors = validate(step, &draft);
            let missing: Vec<Field> = errors.keys().copied().collect();
            let mut expected = step.required_fields().to_vec();
            expected.sort();
            assert_eq!(missing, expected, "{step}");
        }
    }

    #[test]
    fn test_identity_step_passes_with_name_and_email() {
        let draft = SubmissionDraft {
            artist_name: "Invader".to_string(),
            artist_email: "space@invader.fr".to_string(),
            ..SubmissionDraft::default()
        };
        assert!(validate(Step::Identity, &draft).is_empty());
    }

    #[test]
    fn test_profile_step_requires_attached_photo() {
        let mut draft = SubmissionDraft {
            artist_portfolio_link: "https://portfolio.example".to_string(),
            artist_social_link: "@artist".to_string(),
            ..SubmissionDraft::default()
        };
        let errors = validate(Step::ArtistProfile, &draft);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[&Field::ArtistImage], "Artist Image is required");

        draft.artist_image = Some(attachment("me.png"));
        assert!(validate(Step::ArtistProfile, &draft).is_empty());
    }

    #[test]
    fn test_listing_reports_only_missing_price() {
        let mut draft = SubmissionDraft {
            artwork_category: "Mural".to_string(),
            artwork_size: "3x4m".to_string(),
            ..SubmissionDraft::default()
        };
        let errors = validate(Step::Listing, &draft);
        assert_eq!(errors.keys().copied().collect::<Vec<_>>(), vec![Field::ArtworkPrice]);

        draft.artwork_price = " ".to_string();
        assert!(validate(Step::Listing, &draft).is_empty());
    }

    #[test]
    fn test_navigation_skips_profile_for_returning_artist() {
        assert_eq!(Step::Identity.next(false), Some(Step::ArtistProfile));
        assert_eq!(Step::Identity.next(true), Some(Step::Artwork));
        assert_eq!(Step::Artwork.previous(false), Some(Step::ArtistProfile));
        assert_eq!(Step::Artwork.previous(true), Some(Step::Identity));
        assert_eq!(Step::Listing.next(false), None);
        assert_eq!(Step::Identity.previous(true), None);
    }
}
