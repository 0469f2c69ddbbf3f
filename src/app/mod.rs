pub mod dispatch;
mod onboarding;
mod view;
