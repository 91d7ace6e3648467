#[allow(unused_imports)]
pub mod prelude {
    pub use super::blog_post::Entity as BlogPost;
    pub use super::company_info::Entity as CompanyInfo;
    pub use super::cta_section::Entity as CtaSection;
    pub use super::customer::Entity as Customer;
    pub use super::gallery_image::Entity as GalleryImage;
    pub use super::hero_section::Entity as HeroSection;
    pub use super::interaction::Entity as Interaction;
    pub use super::lead::Entity as Lead;
    pub use super::newsletter_subscriber::Entity as NewsletterSubscriber;
    pub use super::project::Entity as Project;
    pub use super::service::Entity as Service;
    pub use super::session::Entity as Session;
    pub use super::statistic::Entity as Statistic;
    pub use super::team_member::Entity as TeamMember;
    pub use super::testimonial::Entity as Testimonial;
    pub use super::translation::Entity as Translation;
    pub use super::user::Entity as User;
}

pub mod blog_post;
pub mod company_info;
pub mod cta_section;
pub mod customer;
pub mod gallery_image;
pub mod hero_section;
pub mod interaction;
pub mod lead;
pub mod newsletter_subscriber;
pub mod project;
pub mod service;
pub mod session;
pub mod statistic;
pub mod team_member;
pub mod testimonial;
pub mod translation;
pub mod user;
