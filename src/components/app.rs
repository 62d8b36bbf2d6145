use yew::prelude::*;

use crate::components::booking_form::SERVICES;
use crate::components::{AuthModal, BookingForm, Chatbot, ContactSection, MyAppointments};
use crate::hooks::{use_auth, AuthProvider};

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <AuthProvider>
            <Shell />
        </AuthProvider>
    }
}

#[function_component(Shell)]
fn shell() -> Html {
    let auth = use_auth();

    let on_login_click = {
        let auth = auth.clone();
        Callback::from(move |_: MouseEvent| auth.open_auth_modal())
    };

    let on_logout_click = {
        let auth = auth.clone();
        Callback::from(move |_: MouseEvent| auth.logout())
    };

    html! {
        <>
            <header class="navbar">
                <div class="container">
                    <a class="brand" href="#top">{"AutoCare"}</a>
                    <nav class="nav-links">
                        <a href="#services">{"Services"}</a>
                        <a href="#book">{"Book"}</a>
                        if auth.is_authenticated() {
                            <a href="#my-appointments">{"My Appointments"}</a>
                        }
                        <a href="#contact">{"Contact"}</a>
                    </nav>
                    {
                        match auth.user() {
                            Some(user) => html! {
                                <div class="user-menu">
                                    <span class="user-name">{ format!("Hi, {}", user.name) }</span>
                                    <button class="btn-secondary" onclick={on_logout_click}>{"Log Out"}</button>
                                </div>
                            },
                            None => html! {
                                <button class="btn-primary" onclick={on_login_click}>{"Log In"}</button>
                            },
                        }
                    }
                </div>
            </header>

            <main id="top">
                <section class="hero">
                    <div class="container">
                        <h1>{"Expert care for your car"}</h1>
                        <p>{"Certified mechanics, transparent pricing, same-week appointments."}</p>
                        <a class="btn-primary" href="#book">{"Book an Appointment"}</a>
                    </div>
                </section>

                <section class="services-section" id="services">
                    <div class="container">
                        <h2 class="section-title">{"Our Services"}</h2>
                        <div class="services-grid">
                            {
                                SERVICES.iter().map(|service| html! {
                                    <div class="service-card" key={*service}>
                                        <h4>{service}</h4>
                                    </div>
                                }).collect::<Html>()
                            }
                        </div>
                    </div>
                </section>

                <BookingForm />
                <MyAppointments />
                <ContactSection />
            </main>

            <footer class="footer">
                <div class="container">
                    <p>{"© AutoCare. Mon–Sat, 9 AM – 5 PM · (555) 012-3456"}</p>
                </div>
            </footer>

            <AuthModal />
            <Chatbot />
        </>
    }
}
