//! Login and logout flows

use shopcheck_common::Credentials;

use super::StepLog;
use crate::error::E2eResult;
use crate::session::Session;
use crate::storefront::{self, header, inventory, login, menu};

pub(super) async fn login_logout(session: &Session, steps: &mut StepLog) -> E2eResult<()> {
    let page = session.page();
    let expect = session.expect();
    let credentials = &session.target().credentials;

    steps.step("open login page");
    session.open_login_page().await?;
    expect.to_have_title(storefront::TITLE).await?;
    expect.to_be_visible(login::LOGO).await?;

    steps.step("enter username");
    page.fill(login::USERNAME, &credentials.username).await?;
    expect.to_have_value(login::USERNAME, &credentials.username).await?;

    steps.step("enter password");
    page.fill(login::PASSWORD, &credentials.password).await?;
    expect.to_have_attribute(login::PASSWORD, "type", "password").await?;

    steps.step("submit login form");
    page.click(login::SUBMIT).await?;
    page.wait_for_load_state().await?;
    expect.not_to_have_url(&session.target().base_url).await?;
    expect
        .to_match_url(&storefront::url_pattern(inventory::PATH))
        .await?;
    expect.to_be_visible(header::TITLE).await?;
    expect.to_have_text(header::TITLE, inventory::TITLE).await?;
    expect.not_to_be_visible(login::SUBMIT).await?;
    expect.to_be_visible(header::MENU_BUTTON).await?;

    steps.step("open user menu");
    page.click(header::MENU_BUTTON).await?;
    expect.to_be_visible(menu::WRAP).await?;
    expect.to_be_visible(menu::LOGOUT).await?;
    expect.to_have_text(menu::LOGOUT, "Logout").await?;
    expect.to_be_visible(menu::ALL_ITEMS).await?;
    expect.to_be_visible(menu::ABOUT).await?;

    steps.step("log out");
    page.click(menu::LOGOUT).await?;
    page.wait_for_load_state().await?;
    expect.to_have_url(&session.target().base_url).await?;
    expect.to_be_visible(login::SUBMIT).await?;
    expect.to_be_visible(login::USERNAME).await?;
    expect.to_be_visible(login::PASSWORD).await?;
    expect.not_to_be_visible(header::MENU_BUTTON).await?;
    expect.not_to_be_visible(header::TITLE).await?;

    Ok(())
}

pub(super) async fn invalid_credentials(session: &Session, steps: &mut StepLog) -> E2eResult<()> {
    let page = session.page();
    let expect = session.expect();
    let credentials = Credentials::new("invalid_user", "wrong_password");

    steps.step("open login page");
    session.open_login_page().await?;

    steps.step("submit unknown account");
    page.fill(login::USERNAME, &credentials.username).await?;
    page.fill(login::PASSWORD, &credentials.password).await?;
    page.click(login::SUBMIT).await?;

    steps.step("error banner shown");
    expect.to_be_visible(login::ERROR).await?;
    expect
        .to_contain_text(login::ERROR, "Username and password do not match")
        .await?;

    Ok(())
}
