use crate::state::SharedState;

pub async fn cmd_admin_show(state: &SharedState) -> anyhow::Result<()> {
    let admin = state.operator_auth_service().current_admin().await?;

    println!("Admin: {}", admin.name);
    println!("{:-<70}", "");
    println!("Role:   {}", admin.role);
    println!("Email:  {}", admin.email);
    println!("Avatar: {}", admin.avatar);
    println!(
        "Credentials: {:?}",
        state.config().admin.credential_backend
    );
    Ok(())
}

pub async fn cmd_admin_set_password(state: &SharedState, password: &str) -> anyhow::Result<()> {
    state.operator_auth_service().set_password(password).await?;
    println!("✓ Admin password updated");
    Ok(())
}
