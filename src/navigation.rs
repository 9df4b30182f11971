//! The navigation bar with the three main tabs: Início, Análise and Perfil.

use maud::{Markup, html};

use crate::endpoints;

/// A tab in the navigation bar.
///
/// Only one tab should be current at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_desktop_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-[11px] font-black uppercase tracking-widest \
            text-indigo-600 dark:text-indigo-400"
        } else {
            "block py-2 px-3 text-[11px] font-black uppercase tracking-widest \
            text-slate-400 hover:text-indigo-600 dark:hover:text-indigo-400"
        };

        html!( a href=(self.url) class=(style) aria-current=[self.is_current.then_some("page")] { (self.title) } )
    }

    fn into_bottom_html(self) -> Markup {
        let style = if self.is_current {
            "flex w-full min-w-0 items-center justify-center rounded-2xl \
            bg-indigo-50 px-2.5 py-2 text-[11px] font-black uppercase \
            tracking-widest text-indigo-600 dark:bg-indigo-900/30 \
            dark:text-indigo-300"
        } else {
            "flex w-full min-w-0 items-center justify-center rounded-2xl \
            px-2.5 py-2 text-[11px] font-black uppercase tracking-widest \
            text-slate-400 hover:text-indigo-600 dark:hover:text-indigo-300"
        };

        html! {
            a href=(self.url) class=(style) aria-current=[self.is_current.then_some("page")]
            {
                span class="truncate" { (self.title) }
            }
        }
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// The tab whose URL matches `active_endpoint` is highlighted. Pages
    /// outside the tabs, e.g. the transaction form, highlight nothing.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = [
            (endpoints::DASHBOARD_VIEW, "Início"),
            (endpoints::ANALYTICS_VIEW, "Análise"),
            (endpoints::PROFILE_VIEW, "Perfil"),
        ]
        .into_iter()
        .map(|(url, title)| Link {
            url,
            title,
            is_current: active_endpoint == url,
        })
        .collect();

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        let links = self.links;

        html!(
            nav class="bg-white border-b border-slate-200 dark:bg-slate-900 dark:border-slate-800"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::DASHBOARD_VIEW)
                        class="flex items-center space-x-3"
                    {
                        img
                            src="/static/favicon-32x32.png"
                            alt="Econo"
                            class="h-8"
                        ;

                        span
                            class="self-center text-2xl font-black uppercase tracking-tighter
                            text-slate-900 dark:text-white"
                        {
                            "Econo"
                        }
                    }

                    div class="flex items-center gap-2"
                    {
                        ul class="hidden lg:flex lg:flex-row lg:space-x-4"
                        {
                            @for link in links.clone() {
                                li { (link.into_desktop_html()) }
                            }
                        }

                        a
                            href=(endpoints::NEW_TRANSACTION_VIEW)
                            class="px-4 py-2 bg-indigo-600 hover:bg-indigo-700 text-white
                            rounded-2xl text-[11px] font-black uppercase tracking-widest"
                        {
                            "+ Nova"
                        }

                        a
                            href=(endpoints::LOG_OUT)
                            class="px-3 py-2 text-[11px] font-black uppercase tracking-widest
                            text-slate-400 hover:text-rose-500"
                        {
                            "Sair"
                        }
                    }
                }
            }

            nav class="fixed inset-x-0 bottom-0 z-40 lg:hidden"
            {
                div class="mx-auto max-w-screen-xl px-4 pb-4"
                {
                    ul
                        class="grid grid-cols-3 gap-2 px-4 py-3 rounded-3xl border
                        border-slate-200 bg-white/95 shadow-lg backdrop-blur
                        dark:border-slate-800 dark:bg-slate-900/95"
                        aria-label="Principal"
                    {
                        @for link in links {
                            li class="min-w-0" { (link.into_bottom_html()) }
                        }
                    }
                }
            }
        )
    }
}

#[cfg(test)]
mod nav_bar_tests {
    use scraper::{Html, Selector};

    use crate::{endpoints, navigation::NavBar};

    #[test]
    fn tabs_are_current_only_on_their_page() {
        let cases = [
            (endpoints::DASHBOARD_VIEW, true),
            (endpoints::ANALYTICS_VIEW, true),
            (endpoints::PROFILE_VIEW, true),
            (endpoints::NEW_TRANSACTION_VIEW, false),
            (endpoints::LOG_IN_VIEW, false),
            (endpoints::ROOT, false),
        ];

        for (endpoint, should_be_active) in cases {
            let nav_bar = NavBar::new(endpoint);

            for link in nav_bar.links {
                let want = should_be_active && link.url == endpoint;
                assert_eq!(
                    link.is_current, want,
                    "link {} on page {endpoint}: want current = {want}",
                    link.url
                );
            }
        }
    }

    #[test]
    fn renders_tab_titles_and_log_out() {
        let html = Html::parse_fragment(
            &NavBar::new(endpoints::ANALYTICS_VIEW)
                .into_html()
                .into_string(),
        );

        let current = html
            .select(&Selector::parse("nav ul a[aria-current=page]").unwrap())
            .map(|link| link.text().collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(current, ["Análise", "Análise"]);

        let log_out = html
            .select(&Selector::parse(&format!("a[href=\"{}\"]", endpoints::LOG_OUT)).unwrap())
            .next();
        assert!(log_out.is_some(), "want a link to log out");
    }
}
