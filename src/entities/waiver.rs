use reqwest::Url;

use crate::entities::UserProfile;

pub const FIRST_NAME_PARAM: &str = "wautofill_firstname";
pub const LAST_NAME_PARAM: &str = "wautofill_lastname";
pub const BIRTHDATE_PARAM: &str = "wautofill_dobyyyymmdd";
pub const TAG_PARAM: &str = "wautofill_tag";

/// Tag the waiver service echoes back, tying the signed waiver to a member
/// and a route.
pub fn waiver_tag(member_id: &str, route_id: &str) -> String {
    format!("{}:{}", member_id, route_id)
}

/// Appends the autofill parameters to the waiver base URL. Query parameters
/// already on the base are kept; every value is percent-encoded.
pub fn build_waiver_url(base: &Url, profile: &UserProfile, route_id: &str) -> Url {
    let mut url = base.clone();

    url.query_pairs_mut()
        .append_pair(FIRST_NAME_PARAM, &profile.first_name)
        .append_pair(LAST_NAME_PARAM, &profile.last_name)
        .append_pair(BIRTHDATE_PARAM, &profile.date_of_birth)
        .append_pair(TAG_PARAM, &waiver_tag(&profile.member_id, route_id));

    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: 7,
            display_name: "jrider".into(),
            first_name: "Jo Anne".into(),
            last_name: "O'Rider & Sons".into(),
            date_of_birth: "19700401".into(),
            member_id: "12345".into(),
        }
    }

    fn param(url: &Url, name: &str) -> Vec<String> {
        url.query_pairs()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
            .collect()
    }

    #[test]
    fn tag_joins_member_and_route() {
        let base = Url::parse("https://waiver.example.com/w/abc/web/").unwrap();
        let url = build_waiver_url(&base, &profile(), "R77");

        assert_eq!(param(&url, TAG_PARAM), vec!["12345:R77"]);
        assert_eq!(url.as_str().matches("12345%3AR77").count(), 1);
    }

    #[test]
    fn values_are_percent_encoded() {
        let base = Url::parse("https://waiver.example.com/w/abc/web/").unwrap();
        let url = build_waiver_url(&base, &profile(), "R 7&7");

        assert!(!url.as_str().contains("& Sons"));
        assert_eq!(param(&url, LAST_NAME_PARAM), vec!["O'Rider & Sons"]);
        assert_eq!(param(&url, FIRST_NAME_PARAM), vec!["Jo Anne"]);
        assert_eq!(param(&url, TAG_PARAM), vec!["12345:R 7&7"]);
    }

    #[test]
    fn birthdate_has_no_separators() {
        let base = Url::parse("https://waiver.example.com/w/abc/web/").unwrap();
        let url = build_waiver_url(&base, &profile(), "R77");

        let dob = param(&url, BIRTHDATE_PARAM);
        assert_eq!(dob, vec!["19700401"]);
        assert!(dob[0].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn existing_base_query_is_kept() {
        let base = Url::parse("https://waiver.example.com/web/?lang=en").unwrap();
        let url = build_waiver_url(&base, &profile(), "R77");

        assert_eq!(param(&url, "lang"), vec!["en"]);
        assert_eq!(url.query_pairs().count(), 5);
        assert_eq!(url.host_str(), Some("waiver.example.com"));
    }
}
