use email_address::EmailAddress;
use rusqlite::Connection;

use crate::{
    PasswordHash,
    db::initialize,
    user::{NewUser, ProfileSetup, User, complete_profile, create_user},
};

/// The password of the user made by [create_test_user].
pub(crate) const TEST_PASSWORD: &str = "cafezinho-com-pao-de-queijo";

/// Fast to hash, which keeps the tests quick.
const TEST_BCRYPT_COST: u32 = 4;

/// An in-memory database with every table created.
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// Insert a user with a completed profile.
#[track_caller]
pub(crate) fn create_test_user(connection: &Connection) -> User {
    let user = create_user(
        NewUser {
            email: EmailAddress::new_unchecked("teste@econo.app"),
            display_name: "Maria Teste".to_owned(),
            password_hash: PasswordHash::from_raw_password(TEST_PASSWORD, TEST_BCRYPT_COST)
                .expect("Could not hash test password"),
        },
        connection,
    )
    .expect("Could not create test user");

    complete_profile(
        user.id,
        ProfileSetup {
            age: Some(30),
            birth_date: None,
            photo_url: None,
        },
        connection,
    )
    .expect("Could not complete test user profile")
}

/// Insert a second user that has not completed the profile setup.
#[track_caller]
pub(crate) fn create_other_user(connection: &Connection) -> User {
    create_user(
        NewUser {
            email: EmailAddress::new_unchecked("outro@econo.app"),
            display_name: "João Outro".to_owned(),
            password_hash: PasswordHash::from_raw_password(TEST_PASSWORD, TEST_BCRYPT_COST)
                .expect("Could not hash test password"),
        },
        connection,
    )
    .expect("Could not create other user")
}
