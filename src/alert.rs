//! Toast-style alerts for success, error and informational messages.
//!
//! Alerts replace the `#alert-container` element in the base page with an
//! out-of-band htmx swap, so any htmx response can carry one alongside its
//! regular content.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};
use serde::{
    Deserialize, Deserializer,
    de::{self, IntoDeserializer, value::StrDeserializer},
};

/// An alert message shown in the corner of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The action completed, with some extra details.
    Success { message: String, details: String },
    /// The action completed.
    SuccessSimple { message: String },
    /// The action failed, with details on what went wrong.
    Error { message: String, details: String },
    /// The action failed.
    ErrorSimple { message: String },
    /// Nothing went wrong, but nothing happened either.
    Info { message: String },
}

const ALERT_CONTAINER_STYLE: &str = "position: fixed; bottom: 1rem; left: 50%; \
    transform: translateX(-50%); z-index: 9999;";

impl Alert {
    /// Render the alert as an out-of-band replacement for `#alert-container`.
    pub fn into_html(self) -> Html<String> {
        Html(self.into_markup(true).into_string())
    }

    /// Render the alert inline in a full page, without the out-of-band swap.
    pub fn into_page_markup(self) -> Markup {
        self.into_markup(false)
    }

    fn into_markup(self, out_of_band: bool) -> Markup {
        let (message, details, style) = match self {
            Alert::Success { message, details } => (message, Some(details), SUCCESS_STYLE),
            Alert::SuccessSimple { message } => (message, None, SUCCESS_STYLE),
            Alert::Error { message, details } => (message, Some(details), ERROR_STYLE),
            Alert::ErrorSimple { message } => (message, None, ERROR_STYLE),
            Alert::Info { message } => (message, None, INFO_STYLE),
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob=[out_of_band.then_some("true")]
                class="w-full max-w-md px-4"
                style=(ALERT_CONTAINER_STYLE)
            {
                div
                    role="alert"
                    class={ "flex items-start gap-3 p-4 rounded-xl shadow-2xl border " (style) }
                {
                    div class="flex-1"
                    {
                        p class="text-sm font-medium uppercase tracking-wider" { (message) }

                        @if let Some(details) = details.filter(|details| !details.is_empty()) {
                            p class="mt-1 text-sm" { (details) }
                        }
                    }

                    button
                        type="button"
                        aria-label="Fechar"
                        class="p-1 rounded hover:bg-white/20"
                        onclick="this.closest('#alert-container').classList.add('hidden')"
                    {
                        "✕"
                    }
                }
            }
        }
    }
}

const SUCCESS_STYLE: &str = "bg-emerald-500/90 border-emerald-400 text-white";
const ERROR_STYLE: &str = "bg-rose-500/90 border-rose-400 text-white";
const INFO_STYLE: &str = "bg-indigo-600/90 border-indigo-50 text-white";

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        (StatusCode::OK, self.into_html()).into_response()
    }
}

/// Alerts that survive a redirect by riding along in the `alerta` query
/// parameter of the page being redirected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    TransacaoSalva,
    TransacaoExcluida,
    SemDadosParaExportar,
    PerfilConcluido,
    CadastroRealizado,
}

impl Notice {
    /// The value to use for the `alerta` query parameter.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Notice::TransacaoSalva => "transacao_salva",
            Notice::TransacaoExcluida => "transacao_excluida",
            Notice::SemDadosParaExportar => "sem_dados_para_exportar",
            Notice::PerfilConcluido => "perfil_concluido",
            Notice::CadastroRealizado => "cadastro_realizado",
        }
    }

    /// Append this notice to `url` as the `alerta` query parameter.
    pub fn append_to(&self, url: &str) -> String {
        let separator = if url.contains('?') { '&' } else { '?' };

        format!("{url}{separator}alerta={}", self.as_query_value())
    }

    pub fn into_alert(self) -> Alert {
        match self {
            Notice::TransacaoSalva => Alert::SuccessSimple {
                message: "Transação salva com sucesso!".to_owned(),
            },
            Notice::TransacaoExcluida => Alert::SuccessSimple {
                message: "Transação excluída com sucesso.".to_owned(),
            },
            Notice::SemDadosParaExportar => Alert::Info {
                message: "Nenhum dado encontrado para exportar.".to_owned(),
            },
            Notice::PerfilConcluido => Alert::SuccessSimple {
                message: "Perfil concluído! Bem-vindo ao Econo.".to_owned(),
            },
            Notice::CadastroRealizado => Alert::SuccessSimple {
                message: "Conta criada! Complete seu perfil para continuar.".to_owned(),
            },
        }
    }
}

/// The query string carrying an optional [Notice].
///
/// An unknown `alerta` value is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    #[serde(default, deserialize_with = "known_notice")]
    pub alerta: Option<Notice>,
}

fn known_notice<'de, D>(deserializer: D) -> Result<Option<Notice>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;

    Ok(raw.and_then(|raw| {
        let value: StrDeserializer<'_, de::value::Error> = raw.as_str().into_deserializer();
        Notice::deserialize(value)
            .inspect_err(|error| tracing::debug!("ignoring unknown alert {raw:?}: {error}"))
            .ok()
    }))
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::{Alert, Notice};

    #[test]
    fn renders_out_of_band_alert_container() {
        let html = Alert::Error {
            message: "Erro ao processar.".to_owned(),
            details: "Tente novamente.".to_owned(),
        }
        .into_html();

        let fragment = Html::parse_fragment(&html.0);
        let container = fragment
            .select(&Selector::parse("#alert-container").unwrap())
            .next()
            .expect("No alert container found");
        assert_eq!(container.value().attr("hx-swap-oob"), Some("true"));

        let paragraphs = container
            .select(&Selector::parse("p").unwrap())
            .map(|p| p.text().collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(paragraphs, ["Erro ao processar.", "Tente novamente."]);
    }

    #[test]
    fn page_markup_has_no_out_of_band_swap() {
        let markup = Alert::Info {
            message: "Nenhum dado encontrado para exportar.".to_owned(),
        }
        .into_page_markup();

        let fragment = Html::parse_fragment(&markup.into_string());
        let container = fragment
            .select(&Selector::parse("#alert-container").unwrap())
            .next()
            .expect("No alert container found");
        assert_eq!(container.value().attr("hx-swap-oob"), None);
    }

    #[test]
    fn notice_appends_to_url_with_and_without_query() {
        assert_eq!(
            Notice::TransacaoSalva.append_to("/dashboard"),
            "/dashboard?alerta=transacao_salva"
        );
        assert_eq!(
            Notice::SemDadosParaExportar.append_to("/dashboard?tipo=saida"),
            "/dashboard?tipo=saida&alerta=sem_dados_para_exportar"
        );
    }

    #[test]
    fn notice_query_value_round_trips_through_serde() {
        let query: super::NoticeQuery =
            serde_urlencoded::from_str("alerta=transacao_excluida").unwrap();

        assert_eq!(query.alerta, Some(Notice::TransacaoExcluida));
    }

    #[test]
    fn unknown_notice_is_ignored() {
        let query: super::NoticeQuery = serde_urlencoded::from_str("alerta=foo").unwrap();

        assert_eq!(query.alerta, None);
    }

    #[test]
    fn missing_notice_is_none() {
        let query: super::NoticeQuery = serde_urlencoded::from_str("busca=luz").unwrap();

        assert_eq!(query.alerta, None);
    }
}
