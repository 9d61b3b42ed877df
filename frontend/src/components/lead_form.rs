use std::rc::Rc;

use chrono::Utc;
use gloo_timers::callback::Timeout;
use log::info;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::config::FormConfig;
use crate::lead::{ContactTime, Field, Objective};
use crate::redirect::{BrowserNavigator, BrowserScheduler, RedirectTimer};
use crate::submission::{
    FieldUpdate, FormStatus, GlooWebhook, LeadFormState, SubmissionController, SubmitError,
};

#[derive(Properties, PartialEq)]
pub struct LeadFormProps {
    pub config: FormConfig,
}

pub enum LeadFormMsg {
    Update(FieldUpdate),
    Submit,
    Delivered(Result<(), SubmitError>),
}

pub struct LeadFormComponent {
    state: LeadFormState,
    controller: Rc<SubmissionController<GlooWebhook>>,
    redirect: Option<RedirectTimer<Timeout>>,
}

impl Component for LeadFormComponent {
    type Message = LeadFormMsg;
    type Properties = LeadFormProps;

    fn create(ctx: &Context<Self>) -> Self {
        let config = ctx.props().config.clone();
        Self {
            state: LeadFormState::new(),
            controller: Rc::new(SubmissionController::new(config, GlooWebhook)),
            redirect: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            LeadFormMsg::Update(update) => {
                self.state.update(update);
                true
            }
            LeadFormMsg::Submit => {
                let Some(payload) = self.state.begin_submit(Utc::now()) else {
                    return true;
                };
                let controller = self.controller.clone();
                ctx.link().send_future(async move {
                    LeadFormMsg::Delivered(controller.deliver(&payload).await)
                });
                true
            }
            LeadFormMsg::Delivered(result) => {
                let redirect = self.state.on_delivered(
                    result,
                    &BrowserScheduler,
                    BrowserNavigator,
                    self.controller.config(),
                );
                if redirect.is_some() {
                    self.redirect = redirect;
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if *self.state.status() == FormStatus::Success {
            return self.view_success();
        }

        let link = ctx.link();
        let form = self.state.form();
        let errors = self.state.errors();
        let submitting = *self.state.status() == FormStatus::Submitting;

        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            LeadFormMsg::Submit
        });
        let on_nome = link.callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            LeadFormMsg::Update(FieldUpdate::Nome(input.value()))
        });
        let on_whatsapp = link.callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            LeadFormMsg::Update(FieldUpdate::Whatsapp(input.value()))
        });
        let on_email = link.callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            LeadFormMsg::Update(FieldUpdate::Email(input.value()))
        });
        let on_objetivo = link.callback(|e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            LeadFormMsg::Update(FieldUpdate::Objetivo(select.value().parse().ok()))
        });
        let on_horario = link.callback(|e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            LeadFormMsg::Update(FieldUpdate::Horario(select.value().parse().ok()))
        });
        let on_consent = link.callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            LeadFormMsg::Update(FieldUpdate::LgpdConsent(input.checked()))
        });

        let field_error = |field: Field| match errors.get(field) {
            Some(message) => html! { <p class="field-error">{ message }</p> },
            None => html! {},
        };
        let invalid = |field: Field| errors.get(field).is_some().to_string();

        html! {
            <div class="lead-card">
                <h3 class="lead-title">{"GARANTA SEU ACESSO NO GRUPO VIP"}</h3>

                if let Some(banner) = self.state.banner() {
                    <div class="submit-error">{ banner }</div>
                }

                <form class="lead-form" onsubmit={onsubmit}>
                    <div class="form-field">
                        <input
                            type="text"
                            name="nome"
                            placeholder="Nome completo *"
                            value={form.nome.clone()}
                            oninput={on_nome}
                            aria-invalid={invalid(Field::Nome)}
                        />
                        { field_error(Field::Nome) }
                    </div>

                    <div class="form-field">
                        <input
                            type="tel"
                            name="whatsapp"
                            placeholder="WhatsApp (11) 99999-9999 *"
                            value={form.whatsapp.clone()}
                            oninput={on_whatsapp}
                            aria-invalid={invalid(Field::Whatsapp)}
                        />
                        { field_error(Field::Whatsapp) }
                    </div>

                    <div class="form-field">
                        <input
                            type="email"
                            name="email"
                            placeholder="E-mail (opcional)"
                            value={form.email.clone()}
                            oninput={on_email}
                        />
                    </div>

                    <div class="form-field">
                        <select name="objetivo" onchange={on_objetivo} aria-invalid={invalid(Field::Objetivo)}>
                            <option value="" selected={form.objetivo.is_none()} disabled=true>
                                {"Qual seu objetivo? *"}
                            </option>
                            { for Objective::ALL.iter().map(|o| html! {
                                <option value={o.value()} selected={form.objetivo == Some(*o)}>{ o.label() }</option>
                            }) }
                        </select>
                        { field_error(Field::Objetivo) }
                    </div>

                    <div class="form-field">
                        <select name="horario" onchange={on_horario} aria-invalid={invalid(Field::Horario)}>
                            <option value="" selected={form.horario.is_none()} disabled=true>
                                {"Melhor horário pra contato? *"}
                            </option>
                            { for ContactTime::ALL.iter().map(|t| html! {
                                <option value={t.value()} selected={form.horario == Some(*t)}>{ t.label() }</option>
                            }) }
                        </select>
                        { field_error(Field::Horario) }
                    </div>

                    <div class="form-field consent">
                        <label class="consent-row">
                            <input
                                type="checkbox"
                                id="lgpdConsent"
                                checked={form.lgpd_consent}
                                onchange={on_consent}
                                aria-invalid={invalid(Field::LgpdConsent)}
                            />
                            <span>{"Concordo em receber contato e comunicações da Time Fit."}</span>
                        </label>
                        { field_error(Field::LgpdConsent) }
                    </div>

                    <button type="submit" class="submit-button" disabled={submitting}>
                        if submitting {
                            <><span class="spinner"></span>{"Enviando..."}</>
                        } else {
                            <>{"Quero entrar no grupo"}<span class="arrow">{"→"}</span></>
                        }
                    </button>

                    <p class="form-footnote">
                        {"Ao enviar, você será direcionado automaticamente para o grupo de WhatsApp."}
                    </p>
                </form>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        if let Some(timer) = self.redirect.take() {
            info!("lead form unmounted, cancelling redirect");
            timer.cancel();
        }
    }
}

impl LeadFormComponent {
    fn view_success(&self) -> Html {
        let invite_link = self.controller.config().invite_link.clone();
        html! {
            <div class="lead-card success">
                <div class="success-icon">{"✓"}</div>
                <h3>{"INSCRIÇÃO CONFIRMADA!"}</h3>
                <p>{"Você será redirecionado para o grupo em instantes..."}</p>
                <a class="submit-button" href={invite_link} target="_blank" rel="noopener noreferrer">
                    {"Entrar no grupo agora"}<span class="arrow">{"→"}</span>
                </a>
            </div>
        }
    }
}
