pub mod errors;
pub mod post;
pub mod profile;
pub mod user;

pub use errors::ErrorResponse;
pub use post::{
    CreatePostResponse, FeedItem, FeedResponse, MediaAttachment, NewPost, Post,
    parse_server_timestamp,
};
pub use profile::{
    ActivityItem, AvatarUploadResponse, ContactInfo, EducationItem, ExperienceItem, Profile,
    ProfileUpdate, ProfileUpdateResponse, SocialLinks, join_skills, split_skills,
};
pub use user::{LoginRequest, LoginResponse, SessionUser, SignupRequest, SignupResponse};
