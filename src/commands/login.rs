use crate::args::LoginArgs;
use crate::commands::Out;
use crate::config::Session;
use crate::{Config, Result};

/// Stores the authenticated session in the secrets directory. Obtaining the
/// token happens outside this tool.
pub async fn login(config: &Config, args: &LoginArgs) -> Result<Out<()>> {
    let session = Session::new(args.uid(), args.token());
    config.save_session(&session).await?;
    Ok(Out::new_message(format!(
        "Stored session for user '{}'",
        session.uid()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[clap(flatten)]
        args: LoginArgs,
    }

    #[tokio::test]
    async fn login_overwrites_stored_session() {
        let env = TestEnv::new().await;
        let wrapper = Wrapper::parse_from(["test", "--uid", "someone-else", "--token", "tok-2"]);
        login(&env.config(), &wrapper.args).await.unwrap();
        let session = env.config().session().await.unwrap().unwrap();
        assert_eq!(session.uid(), "someone-else");
        assert_eq!(session.token(), "tok-2");
    }
}
