//! Login and logout commands.

use crate::auth::ConfigAuth;
use crate::cli::LoginArgs;
use crate::error::Result;
use crate::output::Formatter;
use freshtrack_domain::traits::AuthProvider;

/// Execute the login command.
pub fn execute_login(args: LoginArgs, auth: &mut ConfigAuth, formatter: &Formatter) -> Result<()> {
    let user = auth.sign_in(&args.user_id)?;
    println!("{}", formatter.success(&format!("Logged in as {}", user)));
    Ok(())
}

/// Execute the logout command.
pub fn execute_logout(auth: &mut ConfigAuth, formatter: &Formatter) -> Result<()> {
    match auth.current_user() {
        Some(user) => {
            auth.sign_out()?;
            println!("{}", formatter.success(&format!("Logged out {}", user)));
        }
        None => println!("{}", formatter.info("Not logged in")),
    }
    Ok(())
}
