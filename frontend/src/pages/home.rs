use yew::prelude::*;

use crate::components::lead_form::LeadFormComponent;
use crate::config::{self, FormConfig};

#[function_component(Home)]
pub fn home() -> Html {
    let form_config = use_memo(|_| FormConfig::from_build_env(), ());

    {
        use_effect_with_deps(
            move |_| {
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    document.set_title(config::PAGE_TITLE);
                    if let Ok(Some(meta)) = document.query_selector("meta[name=\"description\"]") {
                        let _ = meta.set_attribute("content", config::PAGE_DESCRIPTION);
                    }
                    if let Some(root) = document.document_element() {
                        let _ = root.set_attribute("lang", "pt-BR");
                    }
                }
                || ()
            },
            (),
        );
    }

    html! {
        <section class="hero">
            <style>
                {r#"
                    body {
                        margin: 0;
                        background: #0d0d0d;
                        color: #f5f5f5;
                        font-family: Inter, -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
                    }
                    .hero {
                        min-height: 100vh;
                        background: linear-gradient(135deg, #0d0d0d 0%, #1a1a1a 60%, #2a1505 100%);
                        position: relative;
                        overflow: hidden;
                    }
                    .hero-header { padding: 1.5rem 2rem; max-width: 80rem; margin: 0 auto; }
                    .hero-main {
                        max-width: 80rem;
                        margin: 0 auto;
                        padding: 2rem;
                        display: grid;
                        grid-template-columns: 1fr 1fr;
                        gap: 3rem;
                        align-items: center;
                    }
                    .badge {
                        display: inline-flex;
                        align-items: center;
                        gap: 0.5rem;
                        padding: 0.4rem 0.75rem;
                        border-radius: 999px;
                        background: rgba(255, 122, 0, 0.1);
                        border: 1px solid rgba(255, 122, 0, 0.2);
                        font-size: 0.75rem;
                        text-transform: uppercase;
                        letter-spacing: 0.05em;
                    }
                    .badge-dot { width: 8px; height: 8px; border-radius: 50%; background: #ff7a00; }
                    .headline { font-size: 2.75rem; line-height: 1.15; font-weight: 500; }
                    .subheadline { font-size: 1.1rem; color: rgba(245, 245, 245, 0.8); max-width: 36rem; line-height: 1.6; }
                    .rating { display: flex; align-items: center; gap: 0.5rem; padding-top: 0.75rem; border-top: 1px solid rgba(255, 255, 255, 0.1); }
                    .stars { color: #ff7a00; letter-spacing: 0.1em; }
                    .lead-card {
                        background: #161616;
                        border: 1px solid #2a2a2a;
                        border-radius: 12px;
                        padding: 2rem;
                        box-shadow: 0 8px 32px rgba(0, 0, 0, 0.3);
                    }
                    .lead-card.success { text-align: center; }
                    .success-icon {
                        margin: 0 auto 1rem;
                        width: 4rem;
                        height: 4rem;
                        border-radius: 50%;
                        background: #dcfce7;
                        color: #16a34a;
                        font-size: 2rem;
                        display: flex;
                        align-items: center;
                        justify-content: center;
                    }
                    .lead-title { text-align: center; font-weight: 500; margin-bottom: 1.5rem; }
                    .lead-form { display: flex; flex-direction: column; gap: 1rem; }
                    .form-field input[type=text], .form-field input[type=tel], .form-field input[type=email], .form-field select {
                        width: 100%;
                        box-sizing: border-box;
                        padding: 0.7rem 0.9rem;
                        background: #0d0d0d;
                        color: inherit;
                        border: 1px solid #2a2a2a;
                        border-radius: 6px;
                    }
                    .form-field [aria-invalid=true] { border-color: #ef4444; }
                    .field-error { color: #ef4444; font-size: 0.85rem; margin: 0.35rem 0 0; }
                    .submit-error {
                        margin-bottom: 1rem;
                        padding: 0.75rem;
                        border-radius: 6px;
                        background: rgba(239, 68, 68, 0.1);
                        border: 1px solid rgba(239, 68, 68, 0.2);
                        color: #ef4444;
                        font-size: 0.875rem;
                    }
                    .consent-row { display: flex; gap: 0.75rem; align-items: flex-start; font-size: 0.875rem; cursor: pointer; }
                    .submit-button {
                        display: flex;
                        justify-content: center;
                        align-items: center;
                        gap: 0.5rem;
                        width: 100%;
                        margin-top: 1.5rem;
                        padding: 0.9rem;
                        border: none;
                        border-radius: 6px;
                        background: #ff7a00;
                        color: #0d0d0d;
                        font-size: 1rem;
                        font-weight: 600;
                        text-decoration: none;
                        cursor: pointer;
                        box-sizing: border-box;
                    }
                    .submit-button:disabled { opacity: 0.6; cursor: wait; }
                    .spinner {
                        width: 18px;
                        height: 18px;
                        border: 3px solid rgba(0, 0, 0, .3);
                        border-radius: 50%;
                        border-top-color: #0d0d0d;
                        animation: spin 1s linear infinite;
                    }
                    @keyframes spin { to { transform: rotate(360deg); } }
                    .form-footnote { text-align: center; font-size: 0.75rem; color: rgba(245, 245, 245, 0.6); }
                    @media (max-width: 1024px) {
                        .hero-main { grid-template-columns: 1fr; }
                        .headline { font-size: 2rem; }
                    }
                "#}
            </style>

            <header class="hero-header">
                <img src="/logo-stronix.png" alt={config::PAGE_TITLE} width="200" height="100" />
            </header>

            <main class="hero-main">
                <div class="hero-copy">
                    <div class="badge">
                        <span class="badge-dot"></span>
                        <span>{"NOVA UNIDADE • STRONIX ACADEMIA"}</span>
                    </div>
                    <h1 class="headline">
                        {"UMA ACADEMIA TOTALMENTE RENOVADA, PROJETADA PARA MELHORAR OS RESULTADOS DOS NOSSOS ALUNOS"}
                    </h1>
                    <p class="subheadline">
                        {"A Stronix nasce como a evolução da Time Fit, trazendo uma estrutura mais completa, novos espaços de treino e o mesmo padrão na qualidade do atendimento."}
                    </p>
                    <div class="rating">
                        <span class="stars" aria-label="5 estrelas">{ ("★").repeat(5) }</span>
                        <span>{"Avaliação no Google"}</span>
                    </div>
                </div>

                <div class="hero-form">
                    <LeadFormComponent config={(*form_config).clone()} />
                </div>
            </main>
        </section>
    }
}
