mod shell;
pub use shell::AppShell;

mod login;
pub use login::Login;

mod dashboard;
pub use dashboard::Dashboard;

mod records;
pub use records::Records;

mod profile;
pub use profile::ProfileDialog;

mod participants;
pub use participants::Participants;

mod fields;
pub use fields::Fields;

mod tags;
pub use tags::Tags;

mod users;
pub use users::Users;
