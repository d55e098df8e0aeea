// Page template - server-rendered markup for one PageView

use std::fmt::Write;

use crate::core::risk::{format_probability, RiskBand};
use crate::graph::escape_markup;
use crate::page::{PageStatus, PageView};

pub const LOADING_MESSAGE: &str =
    "The first request may take some time to wake up the server...";

const ETHEREUM_LOGO_PATHS: [(&str, &str); 6] = [
    ("#343434", "M127.6 0L127.6 279.4 0 208.3z"),
    ("#8C8C8C", "M127.6 0L256 208.3 127.6 279.4z"),
    ("#3C3C3B", "M127.6 320.5L127.6 417 0 261.2z"),
    ("#8C8C8C", "M127.6 417L256 261.2 127.6 320.5z"),
    ("#141414", "M127.6 279.4L0 208.3 127.6 160.8z"),
    ("#393939", "M127.6 160.8L256 208.3 127.6 279.4z"),
];

pub fn render_page(view: &PageView) -> String {
    let mut html = String::with_capacity(16 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\n");
    if matches!(view.status, PageStatus::Loading) {
        // no script on the page; poll until the answer lands
        html.push_str("<meta http-equiv=\"refresh\" content=\"1\">\n");
    }
    html.push_str("<title>EthXpose</title>\n<link rel=\"stylesheet\" href=\"/static/styles.css\">\n</head>\n<body>\n");

    render_header(&mut html);

    html.push_str("<main>\n");
    match &view.status {
        PageStatus::Success(result) => {
            let band = RiskBand::from_probability(result.fraud_probability);
            let _ = write!(
                html,
                "<div id=\"result-label\"><p class=\"probability\" style=\"color: {color}\">Fraud Probability: {p}</p><p class=\"band\" style=\"color: {color}\">{label}</p></div>\n",
                color = band.color(),
                p = format_probability(result.fraud_probability),
                label = band.label()
            );
            if let Some(scene) = &view.scene {
                html.push_str(&scene.to_svg());
                html.push('\n');
            }
        }
        PageStatus::Loading => {
            let _ = write!(
                html,
                "<div class=\"loading\"><div class=\"spinner\"></div><p>{}</p></div>\n",
                LOADING_MESSAGE
            );
        }
        PageStatus::Idle | PageStatus::Error(_) => {}
    }
    html.push_str("</main>\n");

    render_footer(&mut html, view);
    html.push_str("</body>\n</html>\n");
    html
}

fn render_header(html: &mut String) {
    html.push_str("<header id=\"header\"><div class=\"brand\">");
    html.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 256 417\">");
    for (fill, path) in ETHEREUM_LOGO_PATHS {
        let _ = write!(html, "<path fill=\"{}\" d=\"{}\"/>", fill, path);
    }
    html.push_str("</svg><div><h1>EthXpose</h1><p class=\"tagline\">Detect fraudulent Ethereum wallets</p></div></div>");
    html.push_str("<h2>Ethereum Wallet Fraud Detection</h2></header>\n");
}

fn render_footer(html: &mut String, view: &PageView) {
    html.push_str("<footer id=\"footer\">\n");
    let _ = write!(
        html,
        "<form method=\"post\" action=\"/classify\"><input type=\"text\" name=\"wallet_address\" value=\"{}\" placeholder=\"Enter wallet address\" pattern=\"0x[a-fA-F0-9]{{40}}\" required autocomplete=\"off\"><button type=\"submit\"{}>Check Wallet</button></form>\n",
        escape_markup(&view.wallet_address),
        if view.can_submit { "" } else { " disabled" }
    );
    html.push_str("<p class=\"hint\">Enter a wallet address to classify its fraud probability and view the transaction graph.</p>\n");
    if let PageStatus::Error(message) = &view.status {
        let _ = write!(html, "<p class=\"error\">{}</p>\n", escape_markup(message));
    }
    html.push_str("</footer>\n");
}
