//! Sample catalogue used to seed a fresh store and as the last fallback when
//! neither the backend nor the snapshot cache can provide jobs.

use chrono::{DateTime, Duration, Utc};

use crate::form::company_logo;
use crate::model::{Compensation, JobId, JobPosting, JobType, PostingStatus};
use crate::remote::posted_time_since;

struct Seed {
    title: &'static str,
    company: &'static str,
    experience: &'static str,
    location: &'static str,
    lpa: f64,
    hours_ago: i64,
    job_type: JobType,
    likes: u32,
    liked: bool,
    description: &'static str,
}

fn catalogue() -> Vec<Seed> {
    vec![
        Seed {
            title: "Senior Full Stack Developer",
            company: "Google",
            experience: "3-5 yr Exp",
            location: "Bangalore",
            lpa: 25.0,
            hours_ago: 2,
            job_type: JobType::FullTime,
            likes: 24,
            liked: false,
            description: "Build scalable web applications on the core platform team with React, Node.js and cloud services.",
        },
        Seed {
            title: "React Native Developer",
            company: "Meta",
            experience: "2-4 yr Exp",
            location: "Hyderabad",
            lpa: 22.0,
            hours_ago: 5,
            job_type: JobType::FullTime,
            likes: 18,
            liked: false,
            description: "Ship cross-platform mobile features used by a global audience.",
        },
        Seed {
            title: "DevOps Engineer",
            company: "Amazon",
            experience: "2-4 yr Exp",
            location: "Mumbai",
            lpa: 20.0,
            hours_ago: 8,
            job_type: JobType::FullTime,
            likes: 32,
            liked: true,
            description: "Own CI/CD pipelines, container orchestration and infrastructure as code.",
        },
        Seed {
            title: "Data Scientist",
            company: "Microsoft",
            experience: "1-3 yr Exp",
            location: "Pune",
            lpa: 18.0,
            hours_ago: 12,
            job_type: JobType::FullTime,
            likes: 15,
            liked: false,
            description: "Turn product telemetry into models and insights that guide roadmap decisions.",
        },
        Seed {
            title: "Frontend Developer",
            company: "Flipkart",
            experience: "1-2 yr Exp",
            location: "Bangalore",
            lpa: 15.0,
            hours_ago: 24,
            job_type: JobType::FullTime,
            likes: 27,
            liked: false,
            description: "Craft fast, accessible storefront experiences for millions of shoppers.",
        },
        Seed {
            title: "Senior UX/UI Designer",
            company: "Adobe",
            experience: "4-6 yr Exp",
            location: "Remote",
            lpa: 28.0,
            hours_ago: 6,
            job_type: JobType::Remote,
            likes: 41,
            liked: false,
            description: "Lead design for creative tools from research through polished interaction specs.",
        },
        Seed {
            title: "Graphic Designer",
            company: "Zomato",
            experience: "1-3 yr Exp",
            location: "Delhi",
            lpa: 12.0,
            hours_ago: 48,
            job_type: JobType::Contract,
            likes: 9,
            liked: false,
            description: "Produce campaign visuals and brand assets across app and social channels.",
        },
        Seed {
            title: "Digital Marketing Manager",
            company: "Paytm",
            experience: "3-5 yr Exp",
            location: "Noida",
            lpa: 14.0,
            hours_ago: 4,
            job_type: JobType::FullTime,
            likes: 12,
            liked: false,
            description: "Plan and run performance marketing across search, social and email.",
        },
        Seed {
            title: "Business Analyst",
            company: "Infosys",
            experience: "2-4 yr Exp",
            location: "Chennai",
            lpa: 13.0,
            hours_ago: 7,
            job_type: JobType::FullTime,
            likes: 6,
            liked: false,
            description: "Translate client requirements into specifications and track delivery.",
        },
        Seed {
            title: "Financial Analyst",
            company: "Goldman Sachs",
            experience: "1-3 yr Exp",
            location: "Mumbai",
            lpa: 19.0,
            hours_ago: 11,
            job_type: JobType::FullTime,
            likes: 21,
            liked: false,
            description: "Model financial performance and support investment decisions.",
        },
        Seed {
            title: "Software Engineer Intern",
            company: "Tesla",
            experience: "0-1 yr Exp",
            location: "Pune",
            lpa: 6.0,
            hours_ago: 6,
            job_type: JobType::Internship,
            likes: 53,
            liked: false,
            description: "Six-month internship on vehicle software with a path to a full-time offer.",
        },
        Seed {
            title: "Content Writer",
            company: "Byju's",
            experience: "1-2 yr Exp",
            location: "Remote",
            lpa: 7.0,
            hours_ago: 15,
            job_type: JobType::PartTime,
            likes: 4,
            liked: false,
            description: "Write lessons, blog posts and marketing copy for a learning platform.",
        },
        Seed {
            title: "Cloud Solutions Architect",
            company: "IBM",
            experience: "5-8 yr Exp",
            location: "Hybrid",
            lpa: 35.0,
            hours_ago: 13,
            job_type: JobType::FullTime,
            likes: 30,
            liked: false,
            description: "Design enterprise cloud infrastructure and guide client architecture reviews.",
        },
        Seed {
            title: "Cybersecurity Specialist",
            company: "TCS",
            experience: "2-5 yr Exp",
            location: "Remote",
            lpa: 16.0,
            hours_ago: 18,
            job_type: JobType::FullTime,
            likes: 11,
            liked: false,
            description: "Run vulnerability assessments and respond to security incidents.",
        },
    ]
}

/// The sample catalogue with local ids `1..=n`, all published, timestamps
/// relative to `now`.
pub fn seed_jobs(now: DateTime<Utc>) -> Vec<JobPosting> {
    catalogue()
        .into_iter()
        .zip(1u64..)
        .map(|(seed, id)| {
            let created_at = now - Duration::hours(seed.hours_ago);
            JobPosting {
                id: JobId::Local(id),
                title: seed.title.to_string(),
                company: seed.company.to_string(),
                logo: Some(company_logo(seed.company).to_string()),
                description: seed.description.to_string(),
                location: seed.location.to_string(),
                experience: seed.experience.to_string(),
                job_type: seed.job_type,
                compensation: Compensation::lpa(seed.lpa),
                status: PostingStatus::Published,
                posted_time: posted_time_since(created_at, now),
                created_at,
                application_deadline: None,
                requirements: None,
                responsibilities: None,
                is_liked: seed.liked,
                likes_count: seed.likes,
            }
        })
        .collect()
}
