use crate::{
    Res,
    config::Config,
    management::CredentialStore,
    spotify::auth::{AuthFlow, LoginReason},
};

pub async fn auth(config: Config) -> Res<()> {
    let store = CredentialStore::from_config(&config);
    let flow = AuthFlow::new(config, store)?;
    flow.obtain_credential(LoginReason::Initial).await?;
    Ok(())
}
