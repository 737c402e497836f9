//! Activity chart output.

use chrono::Utc;

use userdash_dashboard::AppState;
use userdash_dashboard::activity;

/// Print the monthly and weekly series.
#[allow(clippy::print_stdout)]
pub fn show(state: &AppState) {
    let mut rng = rand::rng();
    let now = Utc::now();

    println!("{:<5}  {:>8}  {:>9}  {:>12}", "MONTH", "ACTIVITY", "NEW USERS", "ACTIVE USERS");
    for point in activity::monthly(now, &mut rng) {
        println!(
            "{:<5}  {:>8}  {:>9}  {:>12}",
            point.name, point.activity, point.new_users, point.active_users
        );
    }

    println!();
    println!("{:<10}  {:>12}  {:>11}", "DATE", "ACTIVE USERS", "TOTAL USERS");
    let stats = state.users().stats();
    for point in activity::weekly(now.date_naive(), &stats, &mut rng) {
        println!(
            "{:<10}  {:>12}  {:>11}",
            point.date.to_string(),
            point.active_users,
            point.total_users
        );
    }
}
