//! The raw profile forms and their conversion into validated updates.

use std::str::FromStr;

use serde::Deserialize;
use time::{Date, macros::format_description};

use crate::{
    Error,
    user::{Gender, ProfileSetup, ProfileUpdate},
};

const MAX_AGE: u8 = 120;

/// The fields of the profile setup page as submitted.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileSetupForm {
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub photo_url: String,
}

impl ProfileSetupForm {
    /// Age and birth date are required, the photo is optional.
    pub fn into_setup(self) -> Result<ProfileSetup, Error> {
        let age = match self.age.trim() {
            "" => return Err(Error::InvalidForm("informe sua idade".to_owned())),
            raw => parse_age(raw)?,
        };
        let Some(birth_date) = parse_optional_date(&self.birth_date)? else {
            return Err(Error::InvalidForm(
                "informe sua data de nascimento".to_owned(),
            ));
        };

        Ok(ProfileSetup {
            age: Some(age),
            birth_date: Some(birth_date),
            photo_url: optional_text(&self.photo_url),
        })
    }
}

/// The fields of the profile tab as submitted.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileForm {
    pub display_name: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub bio: String,
}

impl ProfileForm {
    pub fn into_update(self) -> Result<ProfileUpdate, Error> {
        let display_name = self.display_name.trim();
        if display_name.is_empty() {
            return Err(Error::InvalidForm("informe seu nome".to_owned()));
        }

        let gender = match self.gender.trim() {
            "" => Gender::default(),
            raw => Gender::from_str(raw)?,
        };

        Ok(ProfileUpdate {
            display_name: display_name.to_owned(),
            birth_date: parse_optional_date(&self.birth_date)?,
            gender,
            photo_url: optional_text(&self.photo_url),
            bio: optional_text(&self.bio),
        })
    }
}

fn parse_age(raw: &str) -> Result<u8, Error> {
    match raw.parse::<u8>() {
        Ok(age) if (1..=MAX_AGE).contains(&age) => Ok(age),
        _ => Err(Error::InvalidForm(format!("idade inválida \"{raw}\""))),
    }
}

fn parse_optional_date(raw: &str) -> Result<Option<Date>, Error> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map(Some)
        .map_err(|_| Error::InvalidForm(format!("data de nascimento inválida \"{raw}\"")))
}

fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        user::{Gender, ProfileSetup},
    };

    use super::{ProfileForm, ProfileSetupForm};

    #[test]
    fn setup_form_with_every_field() {
        let form = ProfileSetupForm {
            age: "34".to_owned(),
            birth_date: "1991-07-12".to_owned(),
            photo_url: " https://example.com/foto.png ".to_owned(),
        };

        assert_eq!(
            form.into_setup(),
            Ok(ProfileSetup {
                age: Some(34),
                birth_date: Some(date!(1991 - 07 - 12)),
                photo_url: Some("https://example.com/foto.png".to_owned()),
            })
        );
    }

    #[test]
    fn setup_form_rejects_blank_form() {
        assert!(matches!(
            ProfileSetupForm::default().into_setup(),
            Err(Error::InvalidForm(_))
        ));
    }

    #[test]
    fn setup_form_requires_age_and_birth_date() {
        let form: ProfileSetupForm =
            serde_html_form::from_str("age=&birth_date=1991-07-12&photo_url=").unwrap();
        assert_eq!(
            form.into_setup(),
            Err(Error::InvalidForm("informe sua idade".to_owned()))
        );

        let form: ProfileSetupForm =
            serde_html_form::from_str("age=34&birth_date=&photo_url=").unwrap();
        assert_eq!(
            form.into_setup(),
            Err(Error::InvalidForm("informe sua data de nascimento".to_owned()))
        );
    }

    #[test]
    fn setup_form_photo_is_optional() {
        let form: ProfileSetupForm =
            serde_html_form::from_str("age=34&birth_date=1991-07-12&photo_url=").unwrap();

        assert_eq!(
            form.into_setup(),
            Ok(ProfileSetup {
                age: Some(34),
                birth_date: Some(date!(1991 - 07 - 12)),
                photo_url: None,
            })
        );
    }

    #[test]
    fn rejects_out_of_range_age() {
        for age in ["0", "121", "-3", "trinta"] {
            let form = ProfileSetupForm {
                age: age.to_owned(),
                birth_date: "1991-07-12".to_owned(),
                ..Default::default()
            };

            assert!(
                matches!(form.into_setup(), Err(Error::InvalidForm(_))),
                "age {age} should be rejected"
            );
        }
    }

    #[test]
    fn profile_form_requires_name() {
        let form = ProfileForm {
            display_name: "   ".to_owned(),
            ..Default::default()
        };

        assert!(matches!(form.into_update(), Err(Error::InvalidForm(_))));
    }

    #[test]
    fn profile_form_parses_gender_and_trims_text() {
        let form = ProfileForm {
            display_name: " Ana ".to_owned(),
            birth_date: String::new(),
            gender: "Feminino".to_owned(),
            photo_url: String::new(),
            bio: " Economizando para viajar ".to_owned(),
        };

        let update = form.into_update().unwrap();

        assert_eq!(update.display_name, "Ana");
        assert_eq!(update.gender, Gender::Feminino);
        assert_eq!(update.photo_url, None);
        assert_eq!(update.bio.as_deref(), Some("Economizando para viajar"));
    }

    #[test]
    fn profile_form_rejects_bad_date() {
        let form = ProfileForm {
            display_name: "Ana".to_owned(),
            birth_date: "12/07/1991".to_owned(),
            ..Default::default()
        };

        assert!(matches!(form.into_update(), Err(Error::InvalidForm(_))));
    }
}
